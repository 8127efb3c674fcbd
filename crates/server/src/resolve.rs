//! Path resolution and containment for the file accessor.
//!
//! Every read goes through [`resolve`] followed by [`is_contained`]. The
//! resolved location of a target is computed the same way whether or not the
//! target exists, so a denial never tells the caller anything about the
//! filesystem beyond the root.

use std::path::{Component, Path, PathBuf};

/// Symlinks followed before resolution gives up, matching the usual
/// `ELOOP` limit.
const MAX_SYMLINKS: usize = 40;

/// Resolve `candidate` to an absolute path with symlinks followed and `..`
/// collapsed.
///
/// If the full path cannot be canonicalized (usually because it does not
/// exist), the deepest ancestor that can be is canonicalized instead and the
/// remaining components are folded on one at a time. A component that is a
/// symlink, dangling or not, is replaced by its resolved target.
pub fn resolve(candidate: &Path) -> std::io::Result<PathBuf> {
    let mut links = MAX_SYMLINKS;
    resolve_within(candidate, &mut links)
}

fn resolve_within(candidate: &Path, links: &mut usize) -> std::io::Result<PathBuf> {
    let err = match std::fs::canonicalize(candidate) {
        Ok(path) => return Ok(path),
        Err(e) => e,
    };

    for ancestor in candidate.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        let Ok(base) = std::fs::canonicalize(ancestor) else {
            continue;
        };
        let Ok(rest) = candidate.strip_prefix(ancestor) else {
            continue;
        };
        return fold(base, rest, links);
    }

    Err(err)
}

/// Append `rest` onto the canonical `base`, applying `.` and `..` and
/// following any symlink met along the way.
fn fold(mut base: PathBuf, rest: &Path, links: &mut usize) -> std::io::Result<PathBuf> {
    for component in rest.components() {
        match component {
            Component::ParentDir => {
                base.pop();
            }
            Component::Normal(name) => {
                base.push(name);
                let is_link = std::fs::symlink_metadata(&base)
                    .map(|meta| meta.file_type().is_symlink())
                    .unwrap_or(false);
                if is_link {
                    if *links == 0 {
                        return Err(std::io::Error::other("too many levels of symbolic links"));
                    }
                    *links -= 1;
                    let target = std::fs::read_link(&base)?;
                    base.pop();
                    base = resolve_within(&base.join(target), links)?;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Ok(base)
}

/// Whether `path` is a strict descendant of `root`.
///
/// Both paths must already be canonical. The comparison is per component, so
/// `/srv/data2` is not inside `/srv/data`, and `root` itself is not inside
/// `root`.
pub fn is_contained(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}
