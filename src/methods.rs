//! The closed set of dispatchable operations.
//!
//! `Method` is the handler table: the dispatch server matches on it
//! exhaustively and the tool catalog describes every variant, so adding an
//! operation without a handler or a descriptor does not compile.

macro_rules! methods {
    ($($variant:ident => $name:literal,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Method {
            $($variant,)+
        }

        impl Method {
            /// Every operation, in catalog order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)+];

            /// Wire name, e.g. `github_get_repository`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Method::$variant => $name,)+
                }
            }

            pub fn from_name(name: &str) -> Option<Method> {
                match name {
                    $($name => Some(Method::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

methods! {
    GetRepository => "github_get_repository",
    ListRepositories => "github_list_repositories",
    CreateRepository => "github_create_repository",
    DeleteRepository => "github_delete_repository",
    UpdateRepository => "github_update_repository",
    CreateIssue => "github_create_issue",
    ListIssues => "github_list_issues",
    GetIssue => "github_get_issue",
    UpdateIssue => "github_update_issue",
    CloseIssue => "github_close_issue",
    CreatePullRequest => "github_create_pull_request",
    ListPullRequests => "github_list_pull_requests",
    GetPullRequest => "github_get_pull_request",
    MergePullRequest => "github_merge_pull_request",
    GetAuthenticatedUser => "github_get_authenticated_user",
    ListIssueComments => "github_list_issue_comments",
    CreateIssueComment => "github_create_issue_comment",
    UpdateIssueComment => "github_update_issue_comment",
    DeleteIssueComment => "github_delete_issue_comment",
    ListPullRequestComments => "github_list_pull_request_comments",
    CreatePullRequestComment => "github_create_pull_request_comment",
    ListLabels => "github_list_labels",
    GetLabel => "github_get_label",
    CreateLabel => "github_create_label",
    UpdateLabel => "github_update_label",
    DeleteLabel => "github_delete_label",
    ListMilestones => "github_list_milestones",
    GetMilestone => "github_get_milestone",
    CreateMilestone => "github_create_milestone",
    UpdateMilestone => "github_update_milestone",
    DeleteMilestone => "github_delete_milestone",
    GetFileContent => "github_get_file_content",
    GetDirectoryContent => "github_get_directory_content",
    CreateFile => "github_create_file",
    UpdateFile => "github_update_file",
    DeleteFile => "github_delete_file",
    GetRepositoryTree => "github_get_repository_tree",
    DownloadRepositoryArchive => "github_download_repository_archive",
    ListBranches => "github_list_branches",
    GetBranch => "github_get_branch",
    CreateBranch => "github_create_branch",
    DeleteBranch => "github_delete_branch",
    MergeBranch => "github_merge_branch",
    GetBranchProtection => "github_get_branch_protection",
    UpdateBranchProtection => "github_update_branch_protection",
    DeleteBranchProtection => "github_delete_branch_protection",
    ListCommits => "github_list_commits",
    GetCommit => "github_get_commit",
    CompareCommits => "github_compare_commits",
    ListReferences => "github_list_references",
    GetReference => "github_get_reference",
    CreateReference => "github_create_reference",
    UpdateReference => "github_update_reference",
    DeleteReference => "github_delete_reference",
    CreateTag => "github_create_tag",
    GetTag => "github_get_tag",
    ListReleases => "github_list_releases",
    GetRelease => "github_get_release",
    GetReleaseByTag => "github_get_release_by_tag",
    GetLatestRelease => "github_get_latest_release",
    CreateRelease => "github_create_release",
    UpdateRelease => "github_update_release",
    DeleteRelease => "github_delete_release",
    ListReleaseAssets => "github_list_release_assets",
    GetReleaseAsset => "github_get_release_asset",
    UploadReleaseAsset => "github_upload_release_asset",
    UpdateReleaseAsset => "github_update_release_asset",
    DeleteReleaseAsset => "github_delete_release_asset",
    GenerateReleaseNotes => "github_generate_release_notes",
    ListWorkflows => "github_list_workflows",
    GetWorkflow => "github_get_workflow",
    ListWorkflowRuns => "github_list_workflow_runs",
    GetWorkflowRun => "github_get_workflow_run",
    RerunWorkflow => "github_rerun_workflow",
    RerunFailedJobs => "github_rerun_failed_jobs",
    CancelWorkflowRun => "github_cancel_workflow_run",
    DeleteWorkflowRun => "github_delete_workflow_run",
    ListWorkflowJobs => "github_list_workflow_jobs",
    GetWorkflowJob => "github_get_workflow_job",
    DownloadJobLogs => "github_download_job_logs",
    DownloadWorkflowRunLogs => "github_download_workflow_run_logs",
    DeleteWorkflowRunLogs => "github_delete_workflow_run_logs",
    ListArtifacts => "github_list_artifacts",
    GetArtifact => "github_get_artifact",
    DownloadArtifact => "github_download_artifact",
    DeleteArtifact => "github_delete_artifact",
    CreateWorkflowDispatch => "github_create_workflow_dispatch",
    GetWorkflowUsage => "github_get_workflow_usage",
    GetWorkflowRunUsage => "github_get_workflow_run_usage",
    SearchRepositories => "github_search_repositories",
    SearchCode => "github_search_code",
    SearchCommits => "github_search_commits",
    SearchIssues => "github_search_issues",
    SearchUsers => "github_search_users",
    SearchTopics => "github_search_topics",
    SearchLabels => "github_search_labels",
    ListWebhooks => "github_list_webhooks",
    GetWebhook => "github_get_webhook",
    CreateWebhook => "github_create_webhook",
    UpdateWebhook => "github_update_webhook",
    DeleteWebhook => "github_delete_webhook",
    PingWebhook => "github_ping_webhook",
    TestWebhook => "github_test_webhook",
    ListWebhookDeliveries => "github_list_webhook_deliveries",
    GetWebhookDelivery => "github_get_webhook_delivery",
    RedeliverWebhook => "github_redeliver_webhook",
    GetRepositoryTopics => "github_get_repository_topics",
    ReplaceRepositoryTopics => "github_replace_repository_topics",
    ListCollaborators => "github_list_collaborators",
    CheckCollaborator => "github_check_collaborator",
    AddCollaborator => "github_add_collaborator",
    RemoveCollaborator => "github_remove_collaborator",
    GetCollaboratorPermission => "github_get_collaborator_permission",
    ListRepositoryInvitations => "github_list_repository_invitations",
    DeleteRepositoryInvitation => "github_delete_repository_invitation",
    GetRepositoryLanguages => "github_get_repository_languages",
    GetCodeFrequencyStats => "github_get_code_frequency_stats",
    GetContributorsStats => "github_get_contributors_stats",
    GetParticipationStats => "github_get_participation_stats",
    TransferRepository => "github_transfer_repository",
    ListRepositoryTeams => "github_list_repository_teams",
    CheckTeamPermission => "github_check_team_permission",
    AddRepositoryTeam => "github_add_repository_team",
    RemoveRepositoryTeam => "github_remove_repository_team",
    EnableAutomatedSecurityFixes => "github_enable_automated_security_fixes",
    DisableAutomatedSecurityFixes => "github_disable_automated_security_fixes",
    EnableVulnerabilityAlerts => "github_enable_vulnerability_alerts",
    DisableVulnerabilityAlerts => "github_disable_vulnerability_alerts",
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_resolvable() {
        let names: HashSet<&str> = Method::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), Method::ALL.len());
        for m in Method::ALL {
            assert_eq!(Method::from_name(m.name()), Some(*m));
            assert!(m.name().starts_with("github_"));
        }
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert_eq!(Method::from_name("not_a_real_method"), None);
        assert_eq!(Method::from_name("GITHUB_GET_REPOSITORY"), None);
        assert_eq!(Method::from_name(""), None);
    }
}
