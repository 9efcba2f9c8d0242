//! Resource-relative path helpers for the Skytap REST API.
//!
//! Pure functions producing paths without leading or trailing separators;
//! nested resources compose their parent's path. The dispatcher joins these
//! onto the base URL (and the `v2/` prefix where the API version asks for
//! it).

pub fn configurations() -> &'static str {
    "configurations"
}

pub fn configuration(config_id: &str) -> String {
    format!("configurations/{config_id}")
}

pub fn templates() -> &'static str {
    "templates"
}

pub fn template(template_id: &str) -> String {
    format!("templates/{template_id}")
}

pub fn users() -> &'static str {
    "users"
}

pub fn user(user_id: &str) -> String {
    format!("users/{user_id}")
}

pub fn departments() -> &'static str {
    "departments"
}

pub fn department(department_id: &str) -> String {
    format!("departments/{department_id}")
}

pub fn department_users(department_id: &str) -> String {
    format!("{}/users", department(department_id))
}

pub fn department_user(department_id: &str, user_id: &str) -> String {
    format!("{}/users/{user_id}", department(department_id))
}

pub fn department_quotas(department_id: &str) -> String {
    format!("{}/quotas", department(department_id))
}

pub fn projects() -> &'static str {
    "projects"
}

pub fn project(project_id: &str) -> String {
    format!("projects/{project_id}")
}

pub fn project_configurations(project_id: &str) -> String {
    format!("{}/configurations", project(project_id))
}

pub fn project_configuration(project_id: &str, config_id: &str) -> String {
    format!("{}/configurations/{config_id}", project(project_id))
}

pub fn project_templates(project_id: &str) -> String {
    format!("{}/templates", project(project_id))
}

pub fn project_template(project_id: &str, template_id: &str) -> String {
    format!("{}/templates/{template_id}", project(project_id))
}

pub fn publish_set(config_id: &str, publish_set_id: &str) -> String {
    format!("{}/publish_sets/{publish_set_id}", configuration(config_id))
}

pub fn vms(config_id: &str) -> String {
    format!("{}/vms", configuration(config_id))
}

pub fn vm(config_id: &str, vm_id: &str) -> String {
    format!("{}/vms/{vm_id}", configuration(config_id))
}

pub fn networks(config_id: &str) -> String {
    format!("{}/networks", configuration(config_id))
}

pub fn network(config_id: &str, network_id: &str) -> String {
    format!("{}/networks/{network_id}", configuration(config_id))
}

pub fn interfaces(config_id: &str, vm_id: &str) -> String {
    format!("{}/interfaces", vm(config_id, vm_id))
}

pub fn interface(config_id: &str, vm_id: &str, interface_id: &str) -> String {
    format!("{}/interfaces/{interface_id}", vm(config_id, vm_id))
}

pub fn services(config_id: &str, vm_id: &str, interface_id: &str) -> String {
    format!("{}/services", interface(config_id, vm_id, interface_id))
}

pub fn service(config_id: &str, vm_id: &str, interface_id: &str, service_id: &str) -> String {
    format!(
        "{}/services/{service_id}",
        interface(config_id, vm_id, interface_id)
    )
}

pub fn vpns() -> &'static str {
    "vpns"
}

pub fn vpn(vpn_id: &str) -> String {
    format!("vpns/{vpn_id}")
}

pub fn ips() -> &'static str {
    "ips"
}

pub fn ip(ip_id: &str) -> String {
    format!("ips/{ip_id}")
}
