use frontdesk::profile::{BusinessProfile, ProfileStore, ProfileUpdate};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> ProfileStore {
    ProfileStore::new(dir.path().join("profile.json"))
}

#[test]
fn test_fresh_store_yields_default_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let profile = store.load().unwrap();

    assert_eq!(profile, BusinessProfile::default());
    assert_eq!(profile.agent_name, "Eva");
    assert!(profile.company_name.is_empty());
}

#[test]
fn test_update_one_field_leaves_others_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .update(ProfileUpdate {
            company_name: Some("Acme Plumbing".to_string()),
            ..Default::default()
        })
        .unwrap();

    let updated = store
        .update(ProfileUpdate {
            location: Some("Springfield".to_string()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(updated.company_name, "Acme Plumbing");
    assert_eq!(updated.location, "Springfield");
    assert_eq!(updated.agent_name, "Eva");
    assert!(updated.industry.is_empty());
}

#[test]
fn test_profile_persists_across_store_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.json");

    ProfileStore::new(&path)
        .update(ProfileUpdate {
            company_name: Some("Acme".to_string()),
            agent_name: Some("Ivy".to_string()),
            ..Default::default()
        })
        .unwrap();

    let reloaded = ProfileStore::new(&path).load().unwrap();
    assert_eq!(reloaded.company_name, "Acme");
    assert_eq!(reloaded.agent_name, "Ivy");
}

#[test]
fn test_reset_restores_exact_default() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .update(ProfileUpdate {
            company_name: Some("Acme".to_string()),
            industry: Some("Roofing".to_string()),
            faq: Some("Q: hours? A: 9-5".to_string()),
            agent_name: Some("Ivy".to_string()),
            ..Default::default()
        })
        .unwrap();

    let reset = store.reset().unwrap();
    assert_eq!(reset, BusinessProfile::default());

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded, BusinessProfile::default());
}
