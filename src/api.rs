//! Resource methods, one per documented Skytap API operation.

use std::time::Duration;

use serde_json::{json, Value as JsonValue};

use crate::{
    paths, poll, ApiResponse, ApiVersion, NewUser, QuotaLimits, RequestSpec, ResponseMode, Result,
    SkytapClient,
};

/// The provider answers 409 Conflict / 423 Locked while a VM reconfigures.
const RECONFIGURE_RETRY_CODES: [u16; 2] = [409, 423];

impl SkytapClient {
    // ── Public IPs ────────────────────────────────────────────────────────

    pub async fn get_ips(&self) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::ips())).await?.into_json()
    }

    pub async fn get_ip(&self, ip_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::ip(ip_id)))
            .await?
            .into_json()
    }

    // ── Configurations ────────────────────────────────────────────────────

    /// Lists all configurations visible to the account.
    pub async fn get_configurations(&self) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::configurations()))
            .await?
            .into_json()
    }

    pub async fn get_configuration(&self, config_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::configuration(config_id)))
            .await?
            .into_json()
    }

    /// Creates a configuration from a template.
    pub async fn create_configuration(&self, template_id: &str) -> Result<JsonValue> {
        let spec = RequestSpec::post(paths::configurations())
            .body(json!({ "template_id": template_id }));
        self.request(spec).await?.into_json()
    }

    /// Updates a single configuration attribute.
    pub async fn update_configuration(
        &self,
        config_id: &str,
        attr: &str,
        value: &str,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::configuration(config_id)).query([(attr, value)]);
        self.request(spec).await?.into_json()
    }

    /// Deletes a configuration. The API answers with no content.
    pub async fn delete_configuration(&self, config_id: &str) -> Result<()> {
        let spec = RequestSpec::delete(paths::configuration(config_id)).mode(ResponseMode::Empty);
        self.request(spec).await?;
        Ok(())
    }

    /// Restarts the given VMs of a configuration.
    pub async fn restart_vms(&self, config_id: &str, vm_ids: &[&str]) -> Result<JsonValue> {
        self.set_runstate(config_id, "running", vm_ids).await
    }

    /// Shuts down the given VMs of a configuration.
    pub async fn shutdown_vms(&self, config_id: &str, vm_ids: &[&str]) -> Result<JsonValue> {
        self.set_runstate(config_id, "stopped", vm_ids).await
    }

    async fn set_runstate(
        &self,
        config_id: &str,
        runstate: &str,
        vm_ids: &[&str],
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::configuration(config_id)).query([
            ("runstate", runstate.to_owned()),
            ("multiselect", vm_ids.join(",")),
        ]);
        self.request(spec).await?.into_json()
    }

    // ── Templates ─────────────────────────────────────────────────────────

    pub async fn get_template(&self, template_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::template(template_id)))
            .await?
            .into_json()
    }

    /// Creates a template from a list of VMs in a configuration.
    pub async fn create_template_from_vms(
        &self,
        config_id: &str,
        vm_ids: &[&str],
    ) -> Result<JsonValue> {
        let spec = RequestSpec::post(paths::templates()).query([
            ("configuration_id", config_id.to_owned()),
            ("vm_instance_multiselect", vm_ids.join(",")),
        ]);
        self.request(spec).await?.into_json()
    }

    /// Updates a single template attribute.
    pub async fn update_template(
        &self,
        template_id: &str,
        attr: &str,
        value: &str,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::template(template_id)).query([(attr, value)]);
        self.request(spec).await?.into_json()
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<()> {
        let spec = RequestSpec::delete(paths::template(template_id)).mode(ResponseMode::Empty);
        self.request(spec).await?;
        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────────────────

    pub async fn get_users(&self) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::users()))
            .await?
            .into_json()
    }

    pub async fn get_user(&self, user_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::user(user_id)))
            .await?
            .into_json()
    }

    /// Creates a user from an explicit [`NewUser`] attribute set.
    pub async fn create_user(&self, user: &NewUser) -> Result<JsonValue> {
        let spec = RequestSpec::post(paths::users()).query(user.to_query());
        self.request(spec).await?.into_json()
    }

    /// Updates a single user attribute.
    pub async fn update_user(&self, user_id: &str, attr: &str, value: &str) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::user(user_id)).query([(attr, value)]);
        self.request(spec).await?.into_json()
    }

    // ── Departments ───────────────────────────────────────────────────────

    /// Lists departments, paged by `count` and `offset`.
    pub async fn get_departments(&self, count: u32, offset: u32) -> Result<JsonValue> {
        let spec = RequestSpec::get(paths::departments())
            .query([("count", count.to_string()), ("offset", offset.to_string())]);
        self.request(spec).await?.into_json()
    }

    pub async fn get_department(&self, department_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::department(department_id)))
            .await?
            .into_json()
    }

    /// Lists a department's users, paged by `count` and `offset`.
    pub async fn get_department_users(
        &self,
        department_id: &str,
        count: u32,
        offset: u32,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::get(paths::department_users(department_id))
            .query([("count", count.to_string()), ("offset", offset.to_string())]);
        self.request(spec).await?.into_json()
    }

    pub async fn add_user_to_department(
        &self,
        department_id: &str,
        user_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::post(paths::department_user(department_id, user_id)))
            .await?
            .into_json()
    }

    /// Sets department quota limits (v2 API).
    pub async fn set_department_quotas(
        &self,
        department_id: &str,
        limits: &QuotaLimits,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::department_quotas(department_id))
            .body(limits.to_body())
            .api_version(ApiVersion::V2);
        self.request(spec).await?.into_json()
    }

    /// Sets the department description (v2 API).
    pub async fn set_department_description(
        &self,
        department_id: &str,
        description: &str,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::department(department_id))
            .query([("description", description)])
            .api_version(ApiVersion::V2);
        self.request(spec).await?.into_json()
    }

    /// Current quota usage for a department.
    pub async fn get_department_usage(&self, department_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::department_quotas(department_id)))
            .await?
            .into_json()
    }

    // ── VPNs ──────────────────────────────────────────────────────────────

    pub async fn get_vpns(&self) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::vpns()))
            .await?
            .into_json()
    }

    pub async fn get_vpn(&self, vpn_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::vpn(vpn_id)))
            .await?
            .into_json()
    }

    // ── Publish sets ──────────────────────────────────────────────────────

    pub async fn get_publish_set(
        &self,
        config_id: &str,
        publish_set_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::publish_set(config_id, publish_set_id)))
            .await?
            .into_json()
    }

    pub async fn delete_publish_set(&self, config_id: &str, publish_set_id: &str) -> Result<()> {
        let spec = RequestSpec::delete(paths::publish_set(config_id, publish_set_id))
            .mode(ResponseMode::Empty);
        self.request(spec).await?;
        Ok(())
    }

    // ── VMs ───────────────────────────────────────────────────────────────

    pub async fn get_vms(&self, config_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::vms(config_id)))
            .await?
            .into_json()
    }

    pub async fn get_vm(&self, config_id: &str, vm_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::vm(config_id, vm_id)))
            .await?
            .into_json()
    }

    /// Updates a single VM attribute.
    pub async fn update_vm(
        &self,
        config_id: &str,
        vm_id: &str,
        attr: &str,
        value: &str,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::vm(config_id, vm_id)).query([(attr, value)]);
        self.request(spec).await?.into_json()
    }

    // ── Published services ────────────────────────────────────────────────

    pub async fn get_published_services(
        &self,
        config_id: &str,
        vm_id: &str,
        interface_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::services(config_id, vm_id, interface_id)))
            .await?
            .into_json()
    }

    pub async fn get_published_service(
        &self,
        config_id: &str,
        vm_id: &str,
        interface_id: &str,
        service_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::service(
            config_id,
            vm_id,
            interface_id,
            service_id,
        )))
        .await?
        .into_json()
    }

    /// Exposes a VM port as a published service.
    pub async fn add_published_service(
        &self,
        config_id: &str,
        vm_id: &str,
        interface_id: &str,
        port: u16,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::post(paths::services(config_id, vm_id, interface_id))
            .query([("port", port.to_string())]);
        self.request(spec).await?.into_json()
    }

    /// Deletes a published service, polling through the transient
    /// conflict/lock statuses the provider returns while the VM
    /// reconfigures.
    ///
    /// Makes up to ten attempts with Fibonacci backoff and returns the
    /// final response; fails with
    /// [`SkytapError::RetriesExceeded`](crate::SkytapError::RetriesExceeded)
    /// if the service never leaves the conflicted state.
    pub async fn delete_published_service(
        &self,
        config_id: &str,
        vm_id: &str,
        interface_id: &str,
        service_id: &str,
    ) -> Result<ApiResponse> {
        let path = paths::service(config_id, vm_id, interface_id, service_id);
        poll(
            10,
            Duration::ZERO,
            &RECONFIGURE_RETRY_CODES,
            "delete published service",
            || {
                let spec = RequestSpec::delete(path.clone())
                    .accept([200, 409, 423])
                    .mode(ResponseMode::Raw);
                async move { self.request(spec).await?.into_raw() }
            },
        )
        .await
    }

    // ── Network interfaces ────────────────────────────────────────────────

    pub async fn get_interfaces(&self, config_id: &str, vm_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::interfaces(config_id, vm_id)))
            .await?
            .into_json()
    }

    pub async fn get_interface(
        &self,
        config_id: &str,
        vm_id: &str,
        interface_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::interface(config_id, vm_id, interface_id)))
            .await?
            .into_json()
    }

    /// Creates a NIC on a VM. Undocumented in the provider's API reference.
    pub async fn create_interface(&self, config_id: &str, vm_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::post(paths::interfaces(config_id, vm_id)))
            .await?
            .into_json()
    }

    /// Attaches a NIC to an existing network. Undocumented in the
    /// provider's API reference.
    pub async fn attach_interface(
        &self,
        config_id: &str,
        vm_id: &str,
        interface_id: &str,
        network_id: &str,
    ) -> Result<JsonValue> {
        let spec = RequestSpec::put(paths::interface(config_id, vm_id, interface_id))
            .query([("network_id", network_id)]);
        self.request(spec).await?.into_json()
    }

    // ── Networks ──────────────────────────────────────────────────────────

    pub async fn get_networks(&self, config_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::networks(config_id)))
            .await?
            .into_json()
    }

    pub async fn get_network(&self, config_id: &str, network_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::network(config_id, network_id)))
            .await?
            .into_json()
    }

    // ── Projects ──────────────────────────────────────────────────────────

    pub async fn get_projects(&self) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::projects()))
            .await?
            .into_json()
    }

    pub async fn get_project(&self, project_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::project(project_id)))
            .await?
            .into_json()
    }

    pub async fn get_project_configurations(&self, project_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::project_configurations(project_id)))
            .await?
            .into_json()
    }

    pub async fn get_project_templates(&self, project_id: &str) -> Result<JsonValue> {
        self.request(RequestSpec::get(paths::project_templates(project_id)))
            .await?
            .into_json()
    }

    pub async fn add_configuration_to_project(
        &self,
        project_id: &str,
        config_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::post(paths::project_configuration(
            project_id, config_id,
        )))
        .await?
        .into_json()
    }

    pub async fn add_template_to_project(
        &self,
        project_id: &str,
        template_id: &str,
    ) -> Result<JsonValue> {
        self.request(RequestSpec::post(paths::project_template(
            project_id,
            template_id,
        )))
        .await?
        .into_json()
    }
}
