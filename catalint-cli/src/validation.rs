use std::path::Path;

/// Validate config file exists and is a regular file
pub fn validate_config_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Config file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Config path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate a directory the run reads from
pub fn validate_directory(path: &Path, what: &str) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("{} does not exist: {}", what, path.display()));
    }

    if !path.is_dir() {
        return Err(format!("{} is not a directory: {}", what, path.display()));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    if path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    Ok(())
}

/// Validate language code format (same rules as the lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    catalint::config::validate_language_code(lang).map_err(|e| e.to_string())
}

/// Validate the per-group listing cap
pub fn validate_max_items(max_items: usize) -> Result<(), String> {
    if max_items == 0 {
        return Err("--max-items must be at least 1".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_language_code() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("pt-BR").is_ok());
        assert!(validate_language_code("zh-Hans").is_ok());
        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("not a language").is_err());
    }

    #[test]
    fn test_validate_directory() {
        let dir = TempDir::new().unwrap();
        assert!(validate_directory(dir.path(), "Source directory").is_ok());

        let missing = dir.path().join("missing");
        let err = validate_directory(&missing, "Source directory").unwrap_err();
        assert!(err.starts_with("Source directory does not exist"));

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_directory(&file, "Source directory").is_err());
    }

    #[test]
    fn test_validate_output_path_creates_parent() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out/catalog.csv");
        assert!(validate_output_path(&out).is_ok());
        assert!(dir.path().join("nested/out").is_dir());
        assert!(validate_output_path(dir.path()).is_err());
    }

    #[test]
    fn test_validate_config_path() {
        let dir = TempDir::new().unwrap();
        assert!(validate_config_path(&dir.path().join("catalint.toml")).is_err());
        assert!(validate_config_path(dir.path()).is_err());
    }

    #[test]
    fn test_validate_max_items() {
        assert!(validate_max_items(1).is_ok());
        assert!(validate_max_items(0).is_err());
    }
}
