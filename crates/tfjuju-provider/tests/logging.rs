use tfjuju_provider::ProviderError;
use tfjuju_provider::logging::{LOG_ENV, init_logging, try_init_logging};

#[test]
fn second_install_fails_but_init_tolerates_it() {
    assert_eq!(LOG_ENV, "TF_LOG_PROVIDER_JUJU");
    try_init_logging(false).unwrap();

    let err = try_init_logging(true).unwrap_err();
    assert!(matches!(err, ProviderError::Logging(_)));

    init_logging(false);
    tracing::info!(test = "logging", "subscriber installed");
}
