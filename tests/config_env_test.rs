//! TREEGRID_* environment overrides.
//!
//! Kept apart from the file layering tests because env vars are process-wide;
//! every test here holds `ENV_LOCK` while its variables are set.

use std::fs;
use std::sync::Mutex;

use rstest::rstest;
use tempfile::TempDir;

use treegrid::application::ApplicationError;
use treegrid::config::{local_config_path, Settings};
use treegrid::util::testing;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Load settings with `vars` set, removing them again before returning.
fn load_with_env(vars: &[(&str, &str)], local: Option<&str>) -> Result<Settings, ApplicationError> {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let data_dir = TempDir::new().unwrap();
    let local_path = local_config_path(data_dir.path());
    if let Some(content) = local {
        fs::write(&local_path, content).unwrap();
    }

    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let result = Settings::load_from(None, local.map(|_| local_path.as_path()));
    for (key, _) in vars {
        std::env::remove_var(key);
    }
    result
}

#[test]
fn given_env_vars_when_loading_then_they_override_files() {
    let settings = load_with_env(
        &[
            ("TREEGRID_DEFAULT_DEPTH", "3"),
            ("TREEGRID_COLUMNS", "description,quantity"),
            ("TREEGRID_ORPHAN_POLICY", "root"),
        ],
        Some("default_depth = 1\ncolumns = [\"description\"]\n"),
    )
    .expect("load settings");

    assert_eq!(settings.default_depth, 3);
    assert_eq!(settings.columns, vec!["description", "quantity"]);
    assert_eq!(settings.orphan_policy, treegrid::OrphanPolicy::Root);
}

#[rstest]
#[case::indent("TREEGRID_INDENT_UNIT", "wide")]
#[case::toggle("TREEGRID_TOGGLE_WIDTH", "narrow")]
#[case::depth("TREEGRID_DEFAULT_DEPTH", "deep")]
#[case::policy("TREEGRID_ORPHAN_POLICY", "adopt")]
fn given_malformed_env_value_when_loading_then_config_error_names_variable(
    #[case] key: &str,
    #[case] value: &str,
) {
    let err = load_with_env(&[(key, value)], None).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains(key), "{err}");
}

#[test]
fn given_no_env_vars_when_loading_then_file_values_stay() {
    let settings = load_with_env(&[], Some("indent_unit = 5\n")).expect("load settings");

    assert_eq!(settings.indent_unit, 5);
}
