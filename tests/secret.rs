#[cfg(test)]
mod tests {
    use billable::libs::data_storage::DataStorage;
    use billable::libs::secret::Secret;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SecretTestContext {
        _temp_dir: TempDir,
        secret_file_name: String,
    }

    impl TestContext for SecretTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            SecretTestContext {
                _temp_dir: temp_dir,
                secret_file_name: ".test_token".to_string(),
            }
        }
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn stored_token_is_encrypted_and_removable(ctx: &mut SecretTestContext) {
        let secret = Secret::new(&ctx.secret_file_name, "Token");
        assert!(secret.get().is_err());

        secret.set("clio-token-123").unwrap();
        let path = DataStorage::new().get_path(&ctx.secret_file_name).unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(!on_disk.contains("clio-token-123"));
        assert_eq!(secret.get().unwrap(), "clio-token-123");

        secret.set("rotated").unwrap();
        assert_eq!(Secret::new(&ctx.secret_file_name, "Token").get().unwrap(), "rotated");

        secret.remove().unwrap();
        assert!(!path.exists());
        assert!(secret.get().is_err());
    }
}
