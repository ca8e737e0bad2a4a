//! Library integration tests.

use wslstrap::WslstrapError;

#[test]
fn error_types_are_public() {
    let err = WslstrapError::NotReversible {
        stage: "Application".into(),
    };
    assert!(err.to_string().contains("Application"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> wslstrap::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use wslstrap::cli::Cli;
    use wslstrap::runner::RunMode;

    let cli = Cli::parse_from(["wslstrap", "--status", "--json"]);
    assert!(cli.json);
    assert_eq!(cli.mode(), RunMode::Status);
}

#[test]
fn distro_listing_is_public() {
    use wslstrap::stages::DistroListing;

    let raw = "  NAME      STATE           VERSION\n* Ubuntu    Running         2\n  Debian    Stopped         2\n";
    let listing = DistroListing::parse(raw);
    assert!(listing.contains("ubuntu"));
    assert!(listing.contains("Debian"));
    assert!(!listing.contains("Ubuntu-22.04"));
}

#[test]
fn mock_ui_types_are_public() {
    use wslstrap::ui::{MockUI, SpinnerHandle, SpinnerStatus, UserInterface};

    let mut ui = MockUI::new();
    let mut spinner = ui.start_spinner("Probing");
    spinner.finish_success("found");

    assert_eq!(
        ui.spinner_results(),
        vec![(SpinnerStatus::Success, "found".to_string())]
    );
}
