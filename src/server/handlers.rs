use super::Server;
use crate::client::{ArchiveFormat, Page, StateFilter, WorkflowId};
use crate::error::{normalize, ApiError, ApiResult};
use crate::methods::Method;
use crate::tools;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Typed access to a request's params.
struct Args<'a>(&'a Map<String, Value>);

impl<'a> Args<'a> {
    fn owner_repo(&self) -> ApiResult<(&'a str, &'a str)> {
        Ok((self.text("owner")?, self.text("repo")?))
    }

    fn text(&self, key: &str) -> ApiResult<&'a str> {
        self.opt_text(key).ok_or_else(|| missing(key))
    }

    fn opt_text(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn req<T: DeserializeOwned>(&self, key: &str) -> ApiResult<T> {
        self.opt(key)?.ok_or_else(|| missing(key))
    }

    fn opt<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Option<T>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::deserialize(v).map(Some).map_err(|e| {
                ApiError::invalid_params(format!("Invalid value for parameter '{}': {}", key, e))
                    .with_details(json!({ "field": key }))
            }),
        }
    }

    fn flag(&self, key: &str) -> ApiResult<bool> {
        Ok(self.opt(key)?.unwrap_or(false))
    }

    fn page(&self) -> ApiResult<Page> {
        Ok(Page::new(self.opt("per_page")?, self.opt("page")?))
    }

    /// The whole param object as one typed struct.
    fn parse<T: DeserializeOwned>(&self) -> ApiResult<T> {
        T::deserialize(Value::Object(self.0.clone()))
            .map_err(|e| ApiError::invalid_params(format!("Invalid parameters: {}", e)))
    }
}

fn missing(key: &str) -> ApiError {
    ApiError::invalid_params(format!("Missing required parameter(s): {}", key))
        .with_details(json!({ "missing": [key] }))
}

fn data<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| normalize(e.into()))
}

impl Server {
    pub(super) async fn call(&self, method: Method, params: Map<String, Value>) -> ApiResult<Value> {
        tools::validate_params(method, &params)?;
        let args = Args(&params);
        let gh = &self.client;

        use Method::*;
        match method {
            // Repositories
            GetRepository => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_repository(o, r).await?)
            }
            ListRepositories => data(gh.list_repositories(args.text("username")?).await?),
            CreateRepository => data(gh.create_repository(&args.parse()?).await?),
            DeleteRepository => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_repository(o, r).await?)
            }
            UpdateRepository => data(gh.update_repository(&args.parse()?).await?),
            GetRepositoryTopics => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_repository_topics(o, r).await?)
            }
            ReplaceRepositoryTopics => {
                let (o, r) = args.owner_repo()?;
                let topics: Vec<String> = args.req("topics")?;
                data(gh.replace_repository_topics(o, r, &topics).await?)
            }
            GetRepositoryLanguages => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_repository_languages(o, r).await?)
            }
            GetCodeFrequencyStats => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_code_frequency_stats(o, r).await?)
            }
            GetContributorsStats => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_contributors_stats(o, r).await?)
            }
            GetParticipationStats => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_participation_stats(o, r).await?)
            }
            TransferRepository => data(gh.transfer_repository(&args.parse()?).await?),
            EnableAutomatedSecurityFixes => {
                let (o, r) = args.owner_repo()?;
                data(gh.enable_automated_security_fixes(o, r).await?)
            }
            DisableAutomatedSecurityFixes => {
                let (o, r) = args.owner_repo()?;
                data(gh.disable_automated_security_fixes(o, r).await?)
            }
            EnableVulnerabilityAlerts => {
                let (o, r) = args.owner_repo()?;
                data(gh.enable_vulnerability_alerts(o, r).await?)
            }
            DisableVulnerabilityAlerts => {
                let (o, r) = args.owner_repo()?;
                data(gh.disable_vulnerability_alerts(o, r).await?)
            }
            GetAuthenticatedUser => data(gh.get_authenticated_user().await?),

            // Issues
            CreateIssue => data(gh.create_issue(&args.parse()?).await?),
            ListIssues => data(gh.list_issues(&args.parse()?).await?),
            GetIssue => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_issue(o, r, args.req("issue_number")?).await?)
            }
            UpdateIssue => data(gh.update_issue(&args.parse()?).await?),
            CloseIssue => {
                let (o, r) = args.owner_repo()?;
                data(gh.close_issue(o, r, args.req("issue_number")?).await?)
            }
            ListIssueComments => {
                let (o, r) = args.owner_repo()?;
                let number: u64 = args.req("issue_number")?;
                data(gh.list_issue_comments(o, r, number, args.page()?).await?)
            }
            CreateIssueComment => {
                let (o, r) = args.owner_repo()?;
                let number: u64 = args.req("issue_number")?;
                data(gh.create_issue_comment(o, r, number, args.text("body")?).await?)
            }
            UpdateIssueComment => {
                let (o, r) = args.owner_repo()?;
                let id: u64 = args.req("comment_id")?;
                data(gh.update_issue_comment(o, r, id, args.text("body")?).await?)
            }
            DeleteIssueComment => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_issue_comment(o, r, args.req("comment_id")?).await?)
            }

            // Pull requests
            CreatePullRequest => data(gh.create_pull_request(&args.parse()?).await?),
            ListPullRequests => data(gh.list_pull_requests(&args.parse()?).await?),
            GetPullRequest => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_pull_request(o, r, args.req("pull_number")?).await?)
            }
            MergePullRequest => {
                let (o, r) = args.owner_repo()?;
                let number: u64 = args.req("pull_number")?;
                let message = args.opt_text("commit_message");
                data(gh.merge_pull_request(o, r, number, message).await?)
            }
            ListPullRequestComments => {
                let (o, r) = args.owner_repo()?;
                let number: u64 = args.req("pull_number")?;
                data(gh.list_pull_request_comments(o, r, number, args.page()?).await?)
            }
            CreatePullRequestComment => {
                data(gh.create_pull_request_comment(&args.parse()?).await?)
            }

            // Labels
            ListLabels => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_labels(o, r, args.page()?).await?)
            }
            GetLabel => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_label(o, r, args.text("name")?).await?)
            }
            CreateLabel => data(gh.create_label(&args.parse()?).await?),
            UpdateLabel => data(gh.update_label(&args.parse()?).await?),
            DeleteLabel => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_label(o, r, args.text("name")?).await?)
            }

            // Milestones
            ListMilestones => {
                let (o, r) = args.owner_repo()?;
                let state: Option<StateFilter> = args.opt("state")?;
                data(gh.list_milestones(o, r, state, args.page()?).await?)
            }
            GetMilestone => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_milestone(o, r, args.req("milestone_number")?).await?)
            }
            CreateMilestone => data(gh.create_milestone(&args.parse()?).await?),
            UpdateMilestone => {
                let number: u64 = args.req("milestone_number")?;
                data(gh.update_milestone(number, &args.parse()?).await?)
            }
            DeleteMilestone => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_milestone(o, r, args.req("milestone_number")?).await?)
            }

            // Contents
            GetFileContent => {
                let (o, r) = args.owner_repo()?;
                let path = args.text("path")?;
                data(gh.get_file_content(o, r, path, args.opt_text("ref")).await?)
            }
            GetDirectoryContent => {
                let (o, r) = args.owner_repo()?;
                let path = args.text("path")?;
                data(gh.get_directory_content(o, r, path, args.opt_text("ref")).await?)
            }
            CreateFile => data(gh.create_file(&args.parse()?).await?),
            UpdateFile => data(gh.update_file(&args.parse()?).await?),
            DeleteFile => data(gh.delete_file(&args.parse()?).await?),
            GetRepositoryTree => {
                let (o, r) = args.owner_repo()?;
                let sha = args.text("tree_sha")?;
                data(gh.get_repository_tree(o, r, sha, args.flag("recursive")?).await?)
            }
            DownloadRepositoryArchive => {
                let (o, r) = args.owner_repo()?;
                let format: ArchiveFormat = args.req("archive_format")?;
                data(gh.download_repository_archive(o, r, format, args.opt_text("ref")).await?)
            }

            // Branches
            ListBranches => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_branches(o, r, args.page()?).await?)
            }
            GetBranch => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_branch(o, r, args.text("branch")?).await?)
            }
            CreateBranch => data(gh.create_branch(&args.parse()?).await?),
            DeleteBranch => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_branch(o, r, args.text("branch")?).await?)
            }
            MergeBranch => data(gh.merge_branch(&args.parse()?).await?),
            GetBranchProtection => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_branch_protection(o, r, args.text("branch")?).await?)
            }
            UpdateBranchProtection => data(gh.update_branch_protection(&args.parse()?).await?),
            DeleteBranchProtection => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_branch_protection(o, r, args.text("branch")?).await?)
            }

            // Commits
            ListCommits => data(gh.list_commits(&args.parse()?).await?),
            GetCommit => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_commit(o, r, args.text("ref")?).await?)
            }
            CompareCommits => {
                let (o, r) = args.owner_repo()?;
                let (base, head) = (args.text("base")?, args.text("head")?);
                data(gh.compare_commits(o, r, base, head).await?)
            }

            // References and tags
            ListReferences => {
                let (o, r) = args.owner_repo()?;
                let namespace = args.opt_text("namespace");
                data(gh.list_references(o, r, namespace, args.page()?).await?)
            }
            GetReference => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_reference(o, r, args.text("ref")?).await?)
            }
            CreateReference => {
                let (o, r) = args.owner_repo()?;
                let (git_ref, sha) = (args.text("ref")?, args.text("sha")?);
                data(gh.create_reference(o, r, git_ref, sha).await?)
            }
            UpdateReference => data(gh.update_reference(&args.parse()?).await?),
            DeleteReference => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_reference(o, r, args.text("ref")?).await?)
            }
            CreateTag => data(gh.create_tag(&args.parse()?).await?),
            GetTag => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_tag(o, r, args.text("tag_sha")?).await?)
            }

            // Releases
            ListReleases => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_releases(o, r, args.page()?).await?)
            }
            GetRelease => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_release(o, r, args.req("release_id")?).await?)
            }
            GetReleaseByTag => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_release_by_tag(o, r, args.text("tag")?).await?)
            }
            GetLatestRelease => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_latest_release(o, r).await?)
            }
            CreateRelease => data(gh.create_release(&args.parse()?).await?),
            UpdateRelease => {
                let id: u64 = args.req("release_id")?;
                data(gh.update_release(id, &args.parse()?).await?)
            }
            DeleteRelease => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_release(o, r, args.req("release_id")?).await?)
            }
            ListReleaseAssets => {
                let (o, r) = args.owner_repo()?;
                let id: u64 = args.req("release_id")?;
                data(gh.list_release_assets(o, r, id, args.page()?).await?)
            }
            GetReleaseAsset => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_release_asset(o, r, args.req("asset_id")?).await?)
            }
            UploadReleaseAsset => data(gh.upload_release_asset(&args.parse()?).await?),
            UpdateReleaseAsset => {
                let (o, r) = args.owner_repo()?;
                let id: u64 = args.req("asset_id")?;
                let (name, label) = (args.opt_text("name"), args.opt_text("label"));
                data(gh.update_release_asset(o, r, id, name, label).await?)
            }
            DeleteReleaseAsset => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_release_asset(o, r, args.req("asset_id")?).await?)
            }
            GenerateReleaseNotes => data(gh.generate_release_notes(&args.parse()?).await?),

            // Actions
            ListWorkflows => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_workflows(o, r, args.page()?).await?)
            }
            GetWorkflow => {
                let (o, r) = args.owner_repo()?;
                let id: WorkflowId = args.req("workflow_id")?;
                data(gh.get_workflow(o, r, &id).await?)
            }
            ListWorkflowRuns => data(gh.list_workflow_runs(&args.parse()?).await?),
            GetWorkflowRun => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_workflow_run(o, r, args.req("run_id")?).await?)
            }
            RerunWorkflow => {
                let (o, r) = args.owner_repo()?;
                data(gh.rerun_workflow(o, r, args.req("run_id")?).await?)
            }
            RerunFailedJobs => {
                let (o, r) = args.owner_repo()?;
                data(gh.rerun_failed_jobs(o, r, args.req("run_id")?).await?)
            }
            CancelWorkflowRun => {
                let (o, r) = args.owner_repo()?;
                data(gh.cancel_workflow_run(o, r, args.req("run_id")?).await?)
            }
            DeleteWorkflowRun => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_workflow_run(o, r, args.req("run_id")?).await?)
            }
            ListWorkflowJobs => data(gh.list_workflow_jobs(&args.parse()?).await?),
            GetWorkflowJob => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_workflow_job(o, r, args.req("job_id")?).await?)
            }
            DownloadJobLogs => {
                let (o, r) = args.owner_repo()?;
                data(gh.download_job_logs(o, r, args.req("job_id")?).await?)
            }
            DownloadWorkflowRunLogs => {
                let (o, r) = args.owner_repo()?;
                data(gh.download_workflow_run_logs(o, r, args.req("run_id")?).await?)
            }
            DeleteWorkflowRunLogs => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_workflow_run_logs(o, r, args.req("run_id")?).await?)
            }
            ListArtifacts => data(gh.list_artifacts(&args.parse()?).await?),
            GetArtifact => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_artifact(o, r, args.req("artifact_id")?).await?)
            }
            DownloadArtifact => {
                let (o, r) = args.owner_repo()?;
                data(gh.download_artifact(o, r, args.req("artifact_id")?).await?)
            }
            DeleteArtifact => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_artifact(o, r, args.req("artifact_id")?).await?)
            }
            CreateWorkflowDispatch => data(gh.create_workflow_dispatch(&args.parse()?).await?),
            GetWorkflowUsage => {
                let (o, r) = args.owner_repo()?;
                let id: WorkflowId = args.req("workflow_id")?;
                data(gh.get_workflow_usage(o, r, &id).await?)
            }
            GetWorkflowRunUsage => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_workflow_run_usage(o, r, args.req("run_id")?).await?)
            }

            // Search
            SearchRepositories => data(gh.search_repositories(&args.parse()?).await?),
            SearchCode => data(gh.search_code(&args.parse()?).await?),
            SearchCommits => data(gh.search_commits(&args.parse()?).await?),
            SearchIssues => data(gh.search_issues(&args.parse()?).await?),
            SearchUsers => data(gh.search_users(&args.parse()?).await?),
            SearchTopics => data(gh.search_topics(&args.parse()?).await?),
            SearchLabels => data(gh.search_labels(&args.parse()?).await?),

            // Webhooks
            ListWebhooks => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_webhooks(o, r, args.page()?).await?)
            }
            GetWebhook => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_webhook(o, r, args.req("hook_id")?).await?)
            }
            CreateWebhook => data(gh.create_webhook(&args.parse()?).await?),
            UpdateWebhook => data(gh.update_webhook(&args.parse()?).await?),
            DeleteWebhook => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_webhook(o, r, args.req("hook_id")?).await?)
            }
            PingWebhook => {
                let (o, r) = args.owner_repo()?;
                data(gh.ping_webhook(o, r, args.req("hook_id")?).await?)
            }
            TestWebhook => {
                let (o, r) = args.owner_repo()?;
                data(gh.test_webhook(o, r, args.req("hook_id")?).await?)
            }
            ListWebhookDeliveries => data(gh.list_webhook_deliveries(&args.parse()?).await?),
            GetWebhookDelivery => {
                let (o, r) = args.owner_repo()?;
                let (hook, delivery): (u64, u64) = (args.req("hook_id")?, args.req("delivery_id")?);
                data(gh.get_webhook_delivery(o, r, hook, delivery).await?)
            }
            RedeliverWebhook => {
                let (o, r) = args.owner_repo()?;
                let (hook, delivery): (u64, u64) = (args.req("hook_id")?, args.req("delivery_id")?);
                data(gh.redeliver_webhook(o, r, hook, delivery).await?)
            }

            // Collaborators and teams
            ListCollaborators => data(gh.list_collaborators(&args.parse()?).await?),
            CheckCollaborator => {
                let (o, r) = args.owner_repo()?;
                data(gh.check_collaborator(o, r, args.text("username")?).await?)
            }
            AddCollaborator => {
                let (o, r) = args.owner_repo()?;
                let user = args.text("username")?;
                data(gh.add_collaborator(o, r, user, args.opt_text("permission")).await?)
            }
            RemoveCollaborator => {
                let (o, r) = args.owner_repo()?;
                data(gh.remove_collaborator(o, r, args.text("username")?).await?)
            }
            GetCollaboratorPermission => {
                let (o, r) = args.owner_repo()?;
                data(gh.get_collaborator_permission(o, r, args.text("username")?).await?)
            }
            ListRepositoryInvitations => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_repository_invitations(o, r, args.page()?).await?)
            }
            DeleteRepositoryInvitation => {
                let (o, r) = args.owner_repo()?;
                data(gh.delete_repository_invitation(o, r, args.req("invitation_id")?).await?)
            }
            ListRepositoryTeams => {
                let (o, r) = args.owner_repo()?;
                data(gh.list_repository_teams(o, r, args.page()?).await?)
            }
            CheckTeamPermission => {
                let (o, r) = args.owner_repo()?;
                data(gh.check_team_permission(o, r, args.text("team_slug")?).await?)
            }
            AddRepositoryTeam => {
                let (o, r) = args.owner_repo()?;
                let team = args.text("team_slug")?;
                data(gh.add_repository_team(o, r, team, args.opt_text("permission")).await?)
            }
            RemoveRepositoryTeam => {
                let (o, r) = args.owner_repo()?;
                data(gh.remove_repository_team(o, r, args.text("team_slug")?).await?)
            }
        }
    }
}
