/// Turns the repository argument of a transfer command into a project path.
///
/// Single quotes are dropped, then one leading `/` and one trailing `.git`.
/// Returns `None` for paths that are empty or have empty, `.` or `..`
/// segments.
pub fn sanitize_project_path(arg: &str) -> Option<String> {
    let path = arg.replace('\'', "");
    let path = path.strip_prefix('/').unwrap_or(&path);
    let path = path.strip_suffix(".git").unwrap_or(path);

    if path.is_empty() || path.contains('\0') {
        return None;
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return None;
    }

    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_project_path("/group/repo.git").unwrap(), "group/repo");
        assert_eq!(sanitize_project_path("group/repo").unwrap(), "group/repo");
        assert_eq!(sanitize_project_path("'/group/repo'").unwrap(), "group/repo");
    }

    #[test]
    fn test_sanitize_strips_once() {
        assert_eq!(sanitize_project_path("/g/r.git.git").unwrap(), "g/r.git");
        assert_eq!(sanitize_project_path("/g/sub/r").unwrap(), "g/sub/r");
        assert_eq!(sanitize_project_path("/g/my repo").unwrap(), "g/my repo");
    }

    #[test]
    fn test_sanitize_rejects_escapes() {
        assert_eq!(sanitize_project_path(""), None);
        assert_eq!(sanitize_project_path("/"), None);
        assert_eq!(sanitize_project_path(".git"), None);
        assert_eq!(sanitize_project_path("//etc/passwd"), None);
        assert_eq!(sanitize_project_path("/../secret"), None);
        assert_eq!(sanitize_project_path("g/./r"), None);
        assert_eq!(sanitize_project_path("g//r"), None);
        assert_eq!(sanitize_project_path("g/r/"), None);
    }
}
