use tfjuju_core::models::jaas::{JaasTarget, Principal, RelationFilter, RelationTuple};

#[test]
fn principal_tags_roundtrip() {
    let principals = [
        Principal::User("alice@canonical.com".into()),
        Principal::Group("6f3d2a6e-7c0e-4b5e-9f0e-2d1c6a7b8c9d".into()),
        Principal::ServiceAccount("ci-bot".into()),
        Principal::Role("0e2c1f4a-3b5d-4c6e-8f7a-9b0c1d2e3f4a".into()),
    ];
    for principal in principals {
        let parsed = Principal::from_tag(&principal.tag()).unwrap();
        assert_eq!(parsed, principal);
    }
}

#[test]
fn service_accounts_are_users_in_the_serviceaccount_domain() {
    assert_eq!(
        Principal::ServiceAccount("ci-bot".into()).tag(),
        "user-ci-bot@serviceaccount"
    );
    assert_eq!(
        Principal::from_tag("user-ci-bot@serviceaccount").unwrap(),
        Principal::ServiceAccount("ci-bot".into())
    );
}

#[test]
fn unknown_tags_are_rejected() {
    assert!(Principal::from_tag("machine-0").is_err());
    assert!(Principal::from_tag("user-").is_err());
}

#[test]
fn target_tags() {
    assert_eq!(JaasTarget::Controller.tag(), "controller-jimm");
    assert_eq!(JaasTarget::Cloud("aws".into()).tag(), "cloud-aws");
    assert_eq!(
        JaasTarget::Offer("admin/dev.db".into()).tag(),
        "applicationoffer-admin/dev.db"
    );
}

#[test]
fn filter_matches_only_set_fields() {
    let tuple = RelationTuple::new(
        &Principal::User("alice".into()),
        "administrator",
        &JaasTarget::Controller,
    );

    assert!(RelationFilter::default().matches(&tuple));
    assert!(RelationFilter {
        relation: Some("administrator".into()),
        target: Some("controller-jimm".into()),
        ..Default::default()
    }
    .matches(&tuple));
    assert!(!RelationFilter {
        relation: Some("reader".into()),
        ..Default::default()
    }
    .matches(&tuple));
}
