use chrono::{DateTime, TimeZone, Utc};
use octopilot_core::lookup::{LookupError, NameDirectory};
use octopilot_core::render::RenderContext;
use octopilot_core::{
    render_project_dashboard, render_project_tenant_progression, render_runbook_dashboard,
    render_space_dashboard, DashboardSnapshot, Enrichment, ProjectRef, RenderError, RunbookRef,
    TenantId,
};
use serde_json::{json, Value};

type ReportTestResult<T = ()> = Result<T, String>;

const BASE_URL: &str = "https://octopus.example";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default()
}

fn ctx() -> RenderContext {
    RenderContext::new(BASE_URL, "Spaces-1", now())
}

fn snapshot(value: Value) -> ReportTestResult<DashboardSnapshot> {
    serde_json::from_value(value).map_err(|error| format!("snapshot should parse: {error}"))
}

fn enrichment(value: Value) -> ReportTestResult<Enrichment> {
    serde_json::from_value(value).map_err(|error| format!("enrichment should parse: {error}"))
}

fn web_app() -> ProjectRef {
    serde_json::from_value(json!({"Id": "Projects-1", "Name": "WebApp"}))
        .unwrap_or_else(|error| panic!("project ref should parse: {error}"))
}

fn deployment_url(version: &str, deployment_id: &str) -> String {
    format!(
        "{BASE_URL}/app#/Spaces-1/projects/Projects-1/deployments/releases/{version}/deployments/{deployment_id}"
    )
}

fn deployment(
    environment_id: &str,
    tenant_id: Value,
    version: &str,
    deployment_id: &str,
    created: &str,
    state: &str,
) -> Value {
    json!({
        "ProjectId": "Projects-1",
        "EnvironmentId": environment_id,
        "TenantId": tenant_id,
        "ReleaseVersion": version,
        "DeploymentId": deployment_id,
        "Created": created,
        "State": state,
        "HasWarningsOrErrors": false
    })
}

fn space_snapshot(items: Value) -> Value {
    json!({
        "Environments": [{"Id": "Environments-1", "Name": "Dev"}],
        "ProjectGroups": [{
            "Id": "ProjectGroups-1",
            "Name": "Default",
            "EnvironmentIds": ["Environments-1"]
        }],
        "Projects": [{"Id": "Projects-1", "Name": "WebApp", "ProjectGroupId": "ProjectGroups-1"}],
        "Items": items
    })
}

#[test]
fn space_dashboard_marks_missing_deployments_with_placeholder() -> ReportTestResult {
    let dashboard = snapshot(space_snapshot(json!([])))?;

    let rendered = render_space_dashboard(&ctx(), "Space", &dashboard, &Enrichment::default())
        .map_err(|error| error.to_string())?;

    assert_eq!(rendered, "# Space\n\n| Default | Dev |\n|--|--|\n| WebApp | ⨂|\n\n");
    Ok(())
}

#[test]
fn space_dashboard_links_latest_deployment() -> ReportTestResult {
    let dashboard = snapshot(space_snapshot(json!([deployment(
        "Environments-1",
        Value::Null,
        "1.0.0",
        "Deployments-1",
        "2024-05-01T11:00:00Z",
        "Success"
    )])))?;

    let rendered = render_space_dashboard(&ctx(), "Space", &dashboard, &Enrichment::default())
        .map_err(|error| error.to_string())?;

    let expected_row = format!(
        "| WebApp | 🟢 [1.0.0]({})<br/>🕗 1 hour ago|\n",
        deployment_url("1.0.0", "Deployments-1")
    );
    assert!(rendered.contains(&expected_row), "rendered: {rendered}");
    assert!(!rendered.contains('⨂'));
    Ok(())
}

#[test]
fn space_dashboard_adds_github_column_only_with_ci_statuses() -> ReportTestResult {
    let mut value = space_snapshot(json!([]));
    value["Projects"] = json!([
        {"Id": "Projects-1", "Name": "WebApp", "ProjectGroupId": "ProjectGroups-1"},
        {"Id": "Projects-2", "Name": "Api", "ProjectGroupId": "ProjectGroups-1"}
    ]);
    let dashboard = snapshot(value)?;

    let github = enrichment(json!({
        "RepoRefs": [{"ProjectId": "Projects-1", "Owner": "acme", "Repo": "web"}],
        "CiStatuses": [{
            "ProjectId": "Projects-1",
            "Status": "completed",
            "Conclusion": "success",
            "Name": "ci",
            "ShortSha": "abc123",
            "Url": "https://github.com/acme/web/actions/runs/1"
        }]
    }))?;

    let rendered = render_space_dashboard(&ctx(), "Space", &dashboard, &github)
        .map_err(|error| error.to_string())?;
    assert_eq!(
        rendered,
        "# Space\n\n\
         | Default | GitHub | Dev |\n\
         |--|--|--|\n\
         | WebApp | 🗎 [GitHub Repo](https://github.com/acme/web)<br/>\
         🟢 [ci abc123](https://github.com/acme/web/actions/runs/1)| ⨂|\n\
         | Api | ⨂| ⨂|\n\n"
    );

    let empty_statuses = enrichment(json!({"CiStatuses": []}))?;
    let rendered = render_space_dashboard(&ctx(), "Space", &dashboard, &empty_statuses)
        .map_err(|error| error.to_string())?;
    assert!(!rendered.contains("GitHub"));
    Ok(())
}

#[test]
fn space_dashboard_keeps_group_and_environment_order() -> ReportTestResult {
    let dashboard = snapshot(json!({
        "Environments": [
            {"Id": "Environments-1", "Name": "Dev"},
            {"Id": "Environments-2", "Name": "Prod"}
        ],
        "ProjectGroups": [
            {"Id": "ProjectGroups-2", "Name": "Zeta", "EnvironmentIds": ["Environments-2", "Environments-1"]},
            {"Id": "ProjectGroups-1", "Name": "Alpha", "EnvironmentIds": ["Environments-1", "Environments-9"]}
        ],
        "Projects": [
            {"Id": "Projects-1", "Name": "WebApp", "ProjectGroupId": "ProjectGroups-1"},
            {"Id": "Projects-2", "Name": "Api", "ProjectGroupId": "ProjectGroups-2"}
        ],
        "Items": []
    }))?;

    let rendered = render_space_dashboard(&ctx(), "Space", &dashboard, &Enrichment::default())
        .map_err(|error| error.to_string())?;

    assert_eq!(
        rendered,
        "# Space\n\n\
         | Zeta | Prod | Dev |\n|--|--|--|\n| Api | ⨂| ⨂|\n\n\
         | Alpha | Dev | Environments-9 |\n|--|--|--|\n| WebApp | ⨂| ⨂|\n\n"
    );
    Ok(())
}

#[test]
fn missing_collection_fails_without_output() -> ReportTestResult {
    let mut value = space_snapshot(json!([]));
    value
        .as_object_mut()
        .ok_or("snapshot should be an object")?
        .remove("Items");
    let dashboard = snapshot(value)?;

    let result = render_space_dashboard(&ctx(), "Space", &dashboard, &Enrichment::default());
    assert_eq!(result, Err(RenderError::MissingCollection { key: "Items" }));

    let result = render_project_dashboard(
        &ctx(),
        "Space",
        &web_app(),
        &dashboard,
        &Enrichment::default(),
    );
    assert_eq!(result, Err(RenderError::MissingCollection { key: "Releases" }));
    Ok(())
}

#[test]
fn renders_are_byte_identical_for_same_inputs() -> ReportTestResult {
    let dashboard = snapshot(space_snapshot(json!([deployment(
        "Environments-1",
        Value::Null,
        "1.0.0",
        "Deployments-1",
        "2024-04-30T09:15:00Z",
        "Failed"
    )])))?;

    let first = render_space_dashboard(&ctx(), "Space", &dashboard, &Enrichment::default());
    let second = render_space_dashboard(&ctx(), "Space", &dashboard, &Enrichment::default());
    assert_eq!(first, second);
    Ok(())
}

fn release_deployment(environment_id: &str, deployment_id: &str, created: &str) -> Value {
    deployment(environment_id, Value::Null, "2.0.0", deployment_id, created, "Executing")
}

#[test]
fn project_dashboard_renders_one_row_per_release() -> ReportTestResult {
    let mut warned = release_deployment("Environments-1", "Deployments-2", "2024-05-01T09:00:00Z");
    warned["State"] = json!("Success");
    warned["HasWarningsOrErrors"] = json!(true);

    let mut first_release = deployment(
        "Environments-1",
        Value::Null,
        "1.0.0",
        "Deployments-1",
        "2024-04-30T12:00:00Z",
        "Success",
    );
    first_release["ReleaseId"] = json!("Releases-1");

    let dashboard = snapshot(json!({
        "Environments": [
            {"Id": "Environments-1", "Name": "Dev"},
            {"Id": "Environments-2", "Name": "Prod"}
        ],
        "Releases": [
            {
                "Release": {"Id": "Releases-2", "Version": "2.0.0"},
                "Deployments": {
                    "Environments-1": [
                        release_deployment("Environments-1", "Deployments-3", "2024-05-01T11:55:00Z"),
                        warned
                    ]
                }
            },
            {
                "Release": {"Id": "Releases-1", "Version": "1.0.0"},
                "Deployments": {"Environments-1": [first_release], "Environments-2": []}
            }
        ]
    }))?;
    let github = enrichment(json!({
        "RepoRefs": [{"ProjectId": "Projects-1", "Owner": "acme", "Repo": "web"}],
        "PullRequests": [{"ProjectId": "Projects-1", "Count": 1}],
        "Issues": [{"ProjectId": "Projects-1", "Count": 0}],
        "WorkflowRuns": [{
            "ReleaseId": "Releases-1",
            "Status": "completed",
            "Conclusion": "failure",
            "Name": "build",
            "ShortSha": "abc123",
            "Url": "https://github.com/acme/web/actions/runs/7"
        }],
        "Highlights": [
            {"DeploymentId": "Deployments-1", "Highlights": "Migrated 3 tables"},
            {"DeploymentId": "Deployments-9", "Highlights": "Other deployment"},
            {"DeploymentId": "Deployments-1", "Highlights": "Smoke tests passed"}
        ]
    }))?;

    let rendered = render_project_dashboard(&ctx(), "Space", &web_app(), &dashboard, &github)
        .map_err(|error| error.to_string())?;

    let expected = format!(
        "# Space / WebApp\n\n\
         🗎 [GitHub Repo](https://github.com/acme/web)<br/>\
         🔁 [1 PR](https://github.com/acme/web/pulls)<br/>\
         🐛 [0 issues](https://github.com/acme/web/issues)\n\n\
         | Dev | Prod |\n|--|--|\n\
         | 🔵 [2.0.0]({})<br/>🕗 5 minutes ago<br/>🟡 [2.0.0]({})<br/>🕗 3 hours ago | ⨂ |\n\
         | 🟢 [1.0.0]({})<br/>🕗 1 day ago<br/>\
         🔴 [build abc123](https://github.com/acme/web/actions/runs/7)<br/>\
         Migrated 3 tables<br/>Smoke tests passed | ⨂ |\n",
        deployment_url("2.0.0", "Deployments-3"),
        deployment_url("2.0.0", "Deployments-2"),
        deployment_url("1.0.0", "Deployments-1"),
    );
    assert_eq!(rendered, expected);
    Ok(())
}

fn tenant_snapshot() -> ReportTestResult<DashboardSnapshot> {
    let mut untenanted = deployment(
        "Environments-1",
        Value::Null,
        "1.0.0",
        "Deployments-1",
        "2024-05-01T11:00:00Z",
        "Success",
    );
    untenanted["ReleaseId"] = json!("Releases-1");
    untenanted["ChannelId"] = json!("Channels-1");

    snapshot(json!({
        "Environments": [
            {"Id": "Environments-1", "Name": "Dev"},
            {"Id": "Environments-2", "Name": "Prod"}
        ],
        "Tenants": [
            {"Id": null, "Name": "Untenanted"},
            {
                "Id": "Tenants-1",
                "Name": "Acme",
                "ProjectEnvironments": {"Projects-1": ["Environments-2"]}
            },
            {"Id": "Tenants-2", "Name": "Globex", "ProjectEnvironments": {}}
        ],
        "Items": [
            untenanted,
            deployment(
                "Environments-2",
                json!("Tenants-1"),
                "2.0.0",
                "Deployments-2",
                "2024-04-29T12:00:00Z",
                "Failed"
            ),
            deployment(
                "Environments-2",
                json!(""),
                "3.0.0",
                "Deployments-3",
                "2024-05-01T11:59:00Z",
                "Success"
            )
        ]
    }))
}

#[test]
fn tenant_progression_renders_a_section_per_tenant() -> ReportTestResult {
    let dashboard = tenant_snapshot()?;
    let github = enrichment(json!({
        "WorkflowRuns": [
            {
                "ReleaseId": "Releases-1",
                "Status": "completed",
                "Conclusion": "success",
                "Name": "build",
                "ShortSha": "abc123",
                "Url": "https://github.com/acme/web/actions/runs/1"
            },
            {
                "ReleaseId": "Releases-1",
                "Status": "completed",
                "Conclusion": "failure",
                "Name": "rebuild",
                "ShortSha": "def456",
                "Url": "https://github.com/acme/web/actions/runs/2"
            }
        ],
        "Highlights": [
            {"DeploymentId": "Deployments-1", "Highlights": "Migrated 3 tables"},
            {"DeploymentId": "Deployments-1", "Highlights": "Warm-up done"}
        ]
    }))?;
    let channels = NameDirectory::default().with_channel("Channels-1", "Default");

    let rendered = render_project_tenant_progression(
        &ctx(),
        "Space",
        &web_app(),
        &dashboard,
        &github,
        &channels,
    )
    .map_err(|error| error.to_string())?;

    // The blank tenant id on Deployments-3 is a tenant, not the untenanted row.
    let expected = format!(
        "# Space / WebApp\n\n\
         ## Untenanted\n\
         | Dev | Prod |\n|--|--|\n\
         | 🟢 [1.0.0]({})<br/>🔀 Default<br/>🕗 1 hour ago<br/>\
         🟢 [build abc123](https://github.com/acme/web/actions/runs/1)<br/>\
         Migrated 3 tables<br/>Warm-up done | ⨂ |\n\n\n\
         ## Acme\n\
         | Prod |\n|--|\n\
         | 🔴 [2.0.0]({})<br/>🕗 2 days ago |\n\n\n\
         ## Globex\n\
         \nNo deployments\n\n",
        deployment_url("1.0.0", "Deployments-1"),
        deployment_url("2.0.0", "Deployments-2"),
    );
    assert_eq!(rendered, expected);
    Ok(())
}

#[test]
fn tenant_progression_propagates_channel_lookup_failure() -> ReportTestResult {
    let dashboard = tenant_snapshot()?;

    let result = render_project_tenant_progression(
        &ctx(),
        "Space",
        &web_app(),
        &dashboard,
        &Enrichment::default(),
        &NameDirectory::default(),
    );

    assert_eq!(
        result,
        Err(RenderError::Lookup(LookupError::NotFound {
            kind: "channel",
            id: "Channels-1".to_string()
        }))
    );
    Ok(())
}

#[test]
fn tenant_progression_shows_every_environment_for_blank_tenant_id() -> ReportTestResult {
    let dashboard = snapshot(json!({
        "Environments": [
            {"Id": "Environments-1", "Name": "Dev"},
            {"Id": "Environments-2", "Name": "Prod"}
        ],
        "Tenants": [{"Id": "", "Name": "Blank"}],
        "Items": [
            deployment(
                "Environments-1",
                Value::Null,
                "1.0.0",
                "Deployments-1",
                "2024-05-01T11:00:00Z",
                "Success"
            ),
            deployment(
                "Environments-2",
                json!(""),
                "3.0.0",
                "Deployments-3",
                "2024-05-01T11:59:00Z",
                "Success"
            )
        ]
    }))?;

    let rendered = render_project_tenant_progression(
        &ctx(),
        "Space",
        &web_app(),
        &dashboard,
        &Enrichment::default(),
        &NameDirectory::default(),
    )
    .map_err(|error| error.to_string())?;

    // Environments come from the whole project, but only the blank-id deployment matches.
    let expected = format!(
        "# Space / WebApp\n\n\
         ## Blank\n\
         | Dev | Prod |\n|--|--|\n\
         | ⨂ | 🟢 [3.0.0]({})<br/>🕗 1 minute ago |\n\n\n",
        deployment_url("3.0.0", "Deployments-3"),
    );
    assert_eq!(rendered, expected);
    Ok(())
}

fn runbook_snapshot() -> ReportTestResult<DashboardSnapshot> {
    let run = |tenant_id: Value, created: &str, state: &str, warnings: bool| {
        json!({
            "TenantId": tenant_id,
            "Created": created,
            "State": state,
            "HasWarningsOrErrors": warnings
        })
    };

    snapshot(json!({
        "Environments": [
            {"Id": "Environments-1", "Name": "Dev"},
            {"Id": "Environments-2", "Name": "Prod"}
        ],
        "RunbookRuns": {
            "Environments-2": [run(json!("Tenants-1"), "2024-05-01T11:00:00Z", "Success", false)],
            "Environments-1": [
                run(Value::Null, "2024-05-01T11:50:00Z", "Failed", false),
                run(json!("Tenants-1"), "2024-05-01T10:00:00Z", "Success", true),
                run(json!(""), "2024-05-01T11:59:30Z", "Executing", false)
            ]
        }
    }))
}

fn nightly() -> RunbookRef {
    serde_json::from_value(json!({"Id": "Runbooks-1", "Name": "Nightly"}))
        .unwrap_or_else(|error| panic!("runbook ref should parse: {error}"))
}

#[test]
fn runbook_dashboard_emits_one_row_per_run() -> ReportTestResult {
    let dashboard = runbook_snapshot()?;
    let tenants = NameDirectory::default().with_tenant("Tenants-1", "Acme");

    let rendered = render_runbook_dashboard(&ctx(), &web_app(), &nightly(), &dashboard, &tenants)
        .map_err(|error| error.to_string())?;

    assert_eq!(
        rendered,
        "WebApp / Nightly\n\n\
         |  | Prod | Dev |\n|--|--|--|\n\
         | Acme | 🟢 1 hour ago |\n\
         | Acme | 🟡 2 hours ago |\n\
         | Untenanted | 🔴 10 minutes ago |\n\
         | Untenanted | 🔵 30 seconds ago |\n"
    );
    Ok(())
}

#[test]
fn runbook_dashboard_keeps_tenant_named_untenanted_apart() -> ReportTestResult {
    let dashboard = runbook_snapshot()?;
    let tenants = |_: &TenantId| -> Result<String, LookupError> { Ok("Untenanted".to_string()) };

    let rendered = render_runbook_dashboard(&ctx(), &web_app(), &nightly(), &dashboard, &tenants)
        .map_err(|error| error.to_string())?;

    // Two runs for the real tenant, two for the untenanted bucket.
    assert_eq!(rendered.matches("| Untenanted |").count(), 4);
    assert!(rendered.contains("| Untenanted | 🟢 1 hour ago |\n| Untenanted | 🟡 2 hours ago |\n"));
    Ok(())
}

#[test]
fn runbook_dashboard_propagates_tenant_lookup_failure() -> ReportTestResult {
    let dashboard = runbook_snapshot()?;
    let tenants = |tenant_id: &TenantId| -> Result<String, LookupError> {
        Err(LookupError::Unavailable {
            kind: "tenant",
            message: format!("timed out resolving {tenant_id}"),
        })
    };

    let result = render_runbook_dashboard(&ctx(), &web_app(), &nightly(), &dashboard, &tenants);
    match result {
        Err(RenderError::Lookup(LookupError::Unavailable { kind, message })) => {
            assert_eq!(kind, "tenant");
            assert_eq!(message, "timed out resolving Tenants-1");
            Ok(())
        }
        other => Err(format!("expected tenant lookup failure, got {other:?}")),
    }
}
