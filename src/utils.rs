use std::path::PathBuf;

/// Expand a leading `~` or `~/` using `HOME`. Anything else is returned as-is,
/// as is the input when `HOME` is unset.
pub fn expand_home(raw: &str) -> PathBuf {
    expand_home_with(raw, std::env::var_os("HOME").map(PathBuf::from))
}

fn expand_home_with(raw: &str, home: Option<PathBuf>) -> PathBuf {
    match (raw.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = Some(PathBuf::from("/home/ana"));
        assert_eq!(
            expand_home_with("~/Downloads/BJ_PM25.csv", home.clone()),
            PathBuf::from("/home/ana/Downloads/BJ_PM25.csv")
        );
        assert_eq!(expand_home_with("~", home.clone()), PathBuf::from("/home/ana"));
        assert_eq!(
            expand_home_with("~bob/data.csv", home.clone()),
            PathBuf::from("~bob/data.csv")
        );
        assert_eq!(
            expand_home_with("data/BJ_PM25.csv", home),
            PathBuf::from("data/BJ_PM25.csv")
        );
        assert_eq!(
            expand_home_with("~/x.csv", None),
            PathBuf::from("~/x.csv")
        );
    }
}
