use tfjuju_core::models::access::{ModelAccess, OfferAccess};
use tfjuju_core::models::offer::OfferUrl;
use tfjuju_core::models::ssh_key::SshPublicKey;

#[test]
fn offer_url_with_source_and_owner() {
    let url: OfferUrl = "jimm:admin/dev.postgresql".parse().unwrap();
    assert_eq!(url.source.as_deref(), Some("jimm"));
    assert_eq!(url.owner.as_deref(), Some("admin"));
    assert_eq!(url.model, "dev");
    assert_eq!(url.name, "postgresql");
    assert_eq!(url.to_string(), "jimm:admin/dev.postgresql");
}

#[test]
fn offer_url_without_owner() {
    let url: OfferUrl = "dev.postgresql".parse().unwrap();
    assert!(url.owner.is_none());
    assert_eq!(url.to_string(), "dev.postgresql");
}

#[test]
fn offer_url_rejects_malformed_input() {
    for bad in ["", "admin/dev", "admin/.db", "/dev.db", ":admin/dev.db"] {
        assert!(bad.parse::<OfferUrl>().is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn access_levels_parse_and_order() {
    assert_eq!("admin".parse::<ModelAccess>().unwrap(), ModelAccess::Admin);
    assert!("superuser".parse::<ModelAccess>().is_err());
    assert!(ModelAccess::Read < ModelAccess::Write);
    assert!(OfferAccess::Consume < OfferAccess::Admin);
    assert_eq!(OfferAccess::Consume.to_string(), "consume");
}

#[test]
fn ssh_key_comment_is_the_user_id() {
    let key: SshPublicKey = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5 alice@laptop".parse().unwrap();
    assert_eq!(key.key_type, "ssh-ed25519");
    assert_eq!(key.user_id(), "alice@laptop");

    assert!("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5".parse::<SshPublicKey>().is_err());
    assert!("garbage".parse::<SshPublicKey>().is_err());
}
