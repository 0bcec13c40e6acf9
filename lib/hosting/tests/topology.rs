// SPDX-FileCopyrightText: Copyright (c) 2025 the devproxy-hosting authors
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use devproxy_hosting::devproxy::{
    API_ENDPOINT_NAME, CONTAINER_CERT_DIR, CONTAINER_CONFIG_DIR, PROXY_ENDPOINT_NAME,
};
use devproxy_hosting::resource::{ResourceDescriptor, ResourceKind};
use devproxy_hosting::{
    DevProxyHostingExt, DistributedAppBuilder, HostingConfig, TopologyError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(devproxy_hosting::logging::init);
}

fn app() -> DistributedAppBuilder {
    init_logging();
    DistributedAppBuilder::new("/app")
}

fn assert_default_endpoints(descriptor: &ResourceDescriptor) {
    let endpoints = descriptor.endpoints();
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0].name(), PROXY_ENDPOINT_NAME);
    assert_eq!(*endpoints[0].target_port(), 8000);
    assert_eq!(endpoints[1].name(), API_ENDPOINT_NAME);
    assert_eq!(*endpoints[1].target_port(), 8897);
}

#[test]
fn executable_disables_system_proxy_on_creation() {
    let mut app = app();
    let builder = app.add_devproxy_executable("proxy").unwrap();

    // Before any configurator runs, the argument list is exactly the
    // system-proxy opt-out.
    assert_eq!(
        builder.descriptor().launch_arguments(),
        vec!["--as-system-proxy", "false"]
    );
    assert_eq!(builder.descriptor().kind(), ResourceKind::Executable);

    let spec = builder.descriptor().executable().unwrap();
    assert_eq!(spec.command(), "devproxy");
    assert_eq!(spec.working_dir(), Path::new(""));
}

#[test]
fn both_variants_get_the_default_endpoints() {
    let mut app = app();
    let builder = app.add_devproxy_executable("local").unwrap();
    assert_default_endpoints(builder.descriptor());

    let builder = app.add_devproxy_container("containerized").unwrap();
    assert_default_endpoints(builder.descriptor());
}

#[test]
fn container_starts_without_arguments() {
    let mut app = app();
    let builder = app.add_devproxy_container("proxy").unwrap();
    assert!(builder.descriptor().launch_arguments().is_empty());
}

#[test]
fn executable_config_file_is_resolved_against_base_dir() {
    let mut app = app();
    app.add_devproxy_executable("proxy")
        .unwrap()
        .with_config_file("./devproxyrc.json");

    let app = app.build();
    let args = app.resource("proxy").unwrap().launch_arguments();
    assert_eq!(
        args[2..],
        ["-c".to_string(), "/app/devproxyrc.json".to_string()]
    );
}

#[test]
fn container_config_file_is_passed_verbatim() {
    let mut app = app();
    app.add_devproxy_container("proxy")
        .unwrap()
        .with_config_file("./devproxyrc.json");

    let app = app.build();
    let args = app.resource("proxy").unwrap().launch_arguments();
    assert_eq!(args, ["-c".to_string(), "./devproxyrc.json".to_string()]);
}

#[test]
fn urls_to_watch_is_evaluated_per_materialization() {
    let urls = Arc::new(Mutex::new(vec![
        "https://a".to_string(),
        "https://b".to_string(),
    ]));

    let mut app = app();
    let shared = Arc::clone(&urls);
    app.add_devproxy_executable("proxy")
        .unwrap()
        .with_urls_to_watch(move || shared.lock().unwrap().clone());

    let app = app.build();
    let resource = app.resource("proxy").unwrap();

    assert_eq!(
        resource.launch_arguments()[2..],
        ["-u".to_string(), "https://a https://b".to_string()]
    );

    // The producer runs at materialization, not at configuration: a later
    // change shows up in the next materialization.
    urls.lock().unwrap().push("https://c".to_string());
    assert_eq!(
        resource.launch_arguments()[2..],
        ["-u".to_string(), "https://a https://b https://c".to_string()]
    );
}

#[test]
fn cert_folder_mounts_are_append_only() {
    let mut app = app();
    app.add_devproxy_container("proxy")
        .unwrap()
        .with_cert_folder("./certs")
        .with_cert_folder("./certs");

    let app = app.build();
    let spec = app.resource("proxy").unwrap().container().unwrap();

    // No deduplication: two calls, two mounts.
    assert_eq!(spec.mounts().len(), 2);
    for mount in spec.mounts() {
        assert_eq!(mount.source(), Path::new("/app/certs"));
        assert_eq!(mount.target(), CONTAINER_CERT_DIR);
    }
}

#[test]
fn container_scenario_config_folder_and_image_defaults() {
    let mut app = app();
    app.add_devproxy_container("proxy")
        .unwrap()
        .with_config_folder("./config");

    let app = app.build();
    let spec = app.resource("proxy").unwrap().container().unwrap();

    assert_eq!(spec.registry(), "ghcr.io");
    assert_eq!(spec.image(), "dotnet/dev-proxy");
    assert_eq!(spec.tag(), "latest");

    assert_eq!(spec.mounts().len(), 1);
    assert_eq!(spec.mounts()[0].source(), Path::new("/app/config"));
    assert_eq!(spec.mounts()[0].target(), CONTAINER_CONFIG_DIR);
}

#[test]
fn explicit_config_overrides_image_coordinates() {
    init_logging();
    let config = HostingConfig::new("registry.example.com", "tools/dev-proxy", "0.29.2");

    let mut app = DistributedAppBuilder::with_config("/app", config);
    let builder = app.add_devproxy_container("proxy").unwrap();
    assert_eq!(
        builder.descriptor().container().unwrap().image_reference(),
        "registry.example.com/tools/dev-proxy:0.29.2"
    );
}

#[test]
fn duplicate_resource_name_is_rejected() {
    let mut app = app();
    app.add_devproxy_container("proxy").unwrap();

    let err = app.add_devproxy_executable("proxy").unwrap_err();
    assert_eq!(
        err.downcast::<TopologyError>().unwrap(),
        TopologyError::DuplicateResource("proxy".to_string())
    );
}

#[test]
fn duplicate_endpoint_name_is_rejected() {
    let mut app = app();
    let err = app
        .add_devproxy_container("proxy")
        .unwrap()
        .with_http_endpoint(PROXY_ENDPOINT_NAME, 9000)
        .unwrap_err();

    assert_eq!(
        err,
        TopologyError::DuplicateEndpoint {
            resource: "proxy".to_string(),
            endpoint: PROXY_ENDPOINT_NAME.to_string(),
        }
    );
}

#[test]
fn additional_endpoints_are_kept_in_declaration_order() {
    let mut app = app();
    app.add_devproxy_container("proxy")
        .unwrap()
        .with_http_endpoint("metrics", 9090)
        .unwrap();

    let app = app.build();
    let resource = app.resource("proxy").unwrap();
    assert_eq!(resource.endpoints().len(), 3);
    assert_eq!(*resource.endpoint("metrics").unwrap().target_port(), 9090);
}

#[test]
fn launch_plans_serialize_for_the_engine() {
    let mut app = app();
    app.add_devproxy_container("proxy")
        .unwrap()
        .with_cert_folder("./certs")
        .with_config_file("/config/devproxyrc.json");

    let app = app.build();
    let plans = app.launch_plans();
    assert_eq!(plans.len(), 1);

    let value = serde_json::to_value(&plans[0]).unwrap();
    assert_eq!(value["name"], "proxy");
    assert_eq!(value["kind"], "container");
    assert_eq!(value["args"][0], "-c");
    assert_eq!(value["endpoints"][0]["name"], "proxy");
    assert_eq!(value["endpoints"][0]["target_port"], 8000);
    assert_eq!(value["spec"]["container"]["image"], "dotnet/dev-proxy");
    assert_eq!(value["spec"]["container"]["mounts"][0]["target"], CONTAINER_CERT_DIR);
}
