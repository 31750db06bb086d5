//! End-to-end tests: configuration file, JSON alias tables, passwd directory

use localmail_alias::{
    AliasResolver, Collaborators, Destination, ExpansionPlanner, LocalConfig, OriginCanonicalizer,
    PasswdDirectory, RecordKind, RecordLog, TableRegistry,
};
use localmail_core::{DeliveryStatus, LocalState, UserAttr};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct Deployment {
    _dir: TempDir,
    config: LocalConfig,
}

/// Lay out a configuration with two JSON tables and a passwd file
fn deploy(extra: &str) -> Deployment {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(
        root.join("aliases.json"),
        r#"{
            "postmaster": "root",
            "Staff": "alice, \"|/usr/bin/vacation staff\", bob@example.org",
            "owner-staff": "alice"
        }"#,
    )
    .unwrap();
    fs::write(root.join("virtual.json"), r#"{"staff": "carol", "info": ":include:/etc/lists/info"}"#)
        .unwrap();

    let owner = file_owner(&root.join("aliases.json"));
    fs::write(
        root.join("passwd"),
        format!(
            "# local accounts\nroot:x:0:0:root:/root:/bin/sh\nlists:x:{}:{}:Lists:/var/lib/lists:/bin/sh\nnobody:x:65534:65534::/:/sbin/nologin\n",
            owner, owner
        ),
    )
    .unwrap();

    let toml = format!(
        r#"
[aliases]
alias_maps = ["json:{root}/aliases.json", "json:{root}/virtual.json"]
{extra}

[identity]
passwd_file = "{root}/passwd"
myorigin = "example.com"
"#,
        root = root.display(),
        extra = extra,
    );
    let path = root.join("localmail.toml");
    fs::write(&path, toml).unwrap();

    let config = LocalConfig::load(&path).unwrap();
    config.validate().unwrap();

    Deployment { _dir: dir, config }
}

#[cfg(unix)]
fn file_owner(path: &Path) -> u32 {
    use std::os::unix::fs::MetadataExt;
    fs::metadata(path).unwrap().uid()
}

#[cfg(not(unix))]
fn file_owner(_path: &Path) -> u32 {
    0
}

fn build(config: &LocalConfig) -> (AliasResolver, Arc<ExpansionPlanner>, Arc<RecordLog>) {
    let directory = PasswdDirectory::load(&config.identity.passwd_file).unwrap();
    let planner = Arc::new(ExpansionPlanner::new(
        config.identity.myorigin.clone(),
        config.aliases.default_privs.clone(),
    ));
    let recorder = Arc::new(RecordLog::new());

    let resolver = AliasResolver::new(
        config.aliases.clone(),
        TableRegistry::new(),
        Collaborators {
            directory: Arc::new(directory),
            canonicalizer: Arc::new(OriginCanonicalizer::new(config.identity.myorigin.clone())),
            recorder: recorder.clone(),
            dispatcher: planner.clone(),
        },
    );

    (resolver, planner, recorder)
}

fn recipient(local: &str) -> LocalState {
    LocalState::top_level("7D21E", format!("{}@example.com", local), local, "someone@example.net")
}

#[test]
fn test_config_defaults_fill_missing_keys() {
    let deployment = deploy("");
    let aliases = &deployment.config.aliases;

    assert!(aliases.owner_request_special);
    assert_eq!(aliases.max_expansion_depth, 100);
    assert_eq!(aliases.default_privs, "nobody");
    assert!(aliases.is_reserved("MAILER-DAEMON"));
    assert_eq!(aliases.table_specs().unwrap().len(), 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = LocalConfig::from_toml("[aliases]\nmax_expansion_depth = 0\n").unwrap();
    assert!(config.validate().is_err());

    let config = LocalConfig::from_toml("[aliases]\nalias_maps = [\"aliases\"]\n").unwrap();
    assert!(config.validate().is_err());

    assert!(LocalConfig::from_toml("[aliases]\nalias_maps = 3\n").is_err());
}

#[test]
fn test_json_tables_expand_end_to_end() {
    let deployment = deploy("");
    let (resolver, planner, recorder) = build(&deployment.config);

    // keys are case-folded, and the first table shadows the second
    let status = planner
        .plan_recipient(&resolver, &recipient("STAFF"), &UserAttr::new())
        .unwrap();
    assert_eq!(status, DeliveryStatus::Ok);
    assert!(recorder.records().is_empty());

    let deliveries = planner.deliveries();
    let destinations: Vec<_> = deliveries.iter().map(|d| d.destination.clone()).collect();
    assert_eq!(
        destinations,
        vec![
            Destination::Mailbox("alice".to_string()),
            Destination::Command("/usr/bin/vacation staff".to_string()),
            Destination::Remote("bob@example.org".to_string()),
        ]
    );

    for delivery in &deliveries {
        assert_eq!(delivery.sender, "owner-staff@example.com");
        assert_eq!(delivery.delivered.as_deref(), Some("STAFF@example.com"));
    }

    let expected = if file_owner(deployment.config.identity.passwd_file.as_path()) == 0 {
        "nobody"
    } else {
        "lists"
    };
    assert_eq!(deliveries[1].run_as, expected);
}

#[test]
fn test_second_table_and_unknown_recipient() {
    let deployment = deploy("owner_request_special = false");
    let (resolver, planner, _) = build(&deployment.config);

    planner
        .plan_recipient(&resolver, &recipient("info"), &UserAttr::new())
        .unwrap();
    planner
        .plan_recipient(&resolver, &recipient("dave"), &UserAttr::new())
        .unwrap();

    let deliveries = planner.deliveries();
    assert_eq!(
        deliveries[0].destination,
        Destination::Include("/etc/lists/info".to_string())
    );
    assert_eq!(deliveries[1].destination, Destination::Mailbox("dave".to_string()));
    assert_eq!(deliveries[1].sender, "someone@example.net");
}

#[test]
fn test_missing_table_file_defers() {
    let deployment = deploy("");
    let mut config = deployment.config.clone();
    config.aliases.alias_maps.insert(0, "json:/nonexistent/localmail/aliases.json".to_string());
    let (resolver, planner, recorder) = build(&config);

    let status = planner
        .plan_recipient(&resolver, &recipient("staff"), &UserAttr::new())
        .unwrap();
    assert_eq!(status, DeliveryStatus::Deferred);
    assert!(planner.deliveries().is_empty());
    assert_eq!(recorder.of_kind(RecordKind::Deferred).len(), 1);
}

#[test]
fn test_unknown_table_kind_is_fatal() {
    let deployment = deploy("");
    let mut config = deployment.config.clone();
    config.aliases.alias_maps = vec!["ldap:aliases".to_string()];
    let (resolver, planner, _) = build(&config);

    assert!(planner
        .plan_recipient(&resolver, &recipient("staff"), &UserAttr::new())
        .is_err());
}

#[test]
fn test_deleted_table_keeps_serving_loaded_entries() {
    let deployment = deploy("");
    let (resolver, planner, recorder) = build(&deployment.config);

    let first = planner
        .plan_recipient(&resolver, &recipient("staff"), &UserAttr::new())
        .unwrap();
    let run_as = planner.deliveries()[1].run_as.clone();

    let aliases = deployment.config.identity.passwd_file.with_file_name("aliases.json");
    fs::remove_file(&aliases).unwrap();

    let second = planner
        .plan_recipient(&resolver, &recipient("staff"), &UserAttr::new())
        .unwrap();
    assert_eq!(first, DeliveryStatus::Ok);
    assert_eq!(second, DeliveryStatus::Ok);
    assert!(recorder.records().is_empty());

    let deliveries = planner.deliveries();
    assert_eq!(deliveries.len(), 6);
    assert_eq!(
        deliveries[4].destination,
        Destination::Command("/usr/bin/vacation staff".to_string())
    );
    assert_eq!(deliveries[4].run_as, run_as);
}
