//! Static catalog of dispatchable operations.
//!
//! Every [`Method`] has exactly one descriptor, produced by the exhaustive
//! [`describe`] match, so adding a method without describing it fails to compile.

use crate::error::ApiError;
use crate::methods::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

/// JSON-schema-shaped object description.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

struct Schema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl Schema {
    fn new() -> Self {
        Self {
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    /// `owner` and `repo`, both required.
    fn repo() -> Self {
        Self::new()
            .req("owner", string("Repository owner (user or organization)"))
            .req("repo", string("Repository name"))
    }

    fn req(mut self, name: &str, prop: Value) -> Self {
        self.properties.insert(name.to_string(), prop);
        self.required.push(name.to_string());
        self
    }

    fn opt(mut self, name: &str, prop: Value) -> Self {
        self.properties.insert(name.to_string(), prop);
        self
    }

    fn paged(self) -> Self {
        self.opt("per_page", integer("Results per page (max 100)"))
            .opt("page", integer("Page number of the results"))
    }

    fn build(self) -> ParameterSchema {
        ParameterSchema {
            kind: "object".to_string(),
            properties: self.properties,
            required: self.required,
        }
    }
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn integer(description: &str) -> Value {
    json!({ "type": "integer", "description": description })
}

fn boolean(description: &str) -> Value {
    json!({ "type": "boolean", "description": description })
}

fn object(description: &str) -> Value {
    json!({ "type": "object", "description": description })
}

fn strings(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

fn one_of(values: &[&str], description: &str) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

fn identity(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "name": { "type": "string" },
            "email": { "type": "string" }
        }
    })
}

fn state_filter() -> Value {
    one_of(&["open", "closed", "all"], "Filter by state")
}

fn milestone_state() -> Value {
    one_of(&["open", "closed"], "Milestone state")
}

fn workflow_id() -> Value {
    json!({ "type": ["integer", "string"], "description": "Workflow ID or workflow file name" })
}

fn describe(method: Method) -> (&'static str, Schema) {
    use Method::*;
    match method {
        // Repositories
        GetRepository => (
            "Get information about a specific GitHub repository",
            Schema::repo(),
        ),
        ListRepositories => (
            "List all public repositories for a user",
            Schema::new().req("username", string("GitHub username")),
        ),
        CreateRepository => (
            "Create a new repository for the authenticated user",
            Schema::new()
                .req("name", string("Repository name"))
                .opt("description", string("Repository description"))
                .opt("private", boolean("Whether the repository is private"))
                .opt("auto_init", boolean("Create an initial commit with an empty README"))
                .opt("gitignore_template", string("Gitignore template to apply"))
                .opt("license_template", string("License keyword"))
                .opt("homepage", string("Homepage URL"))
                .opt("has_issues", boolean("Enable issues"))
                .opt("has_projects", boolean("Enable projects"))
                .opt("has_wiki", boolean("Enable the wiki")),
        ),
        DeleteRepository => ("Delete a repository", Schema::repo()),
        UpdateRepository => (
            "Update repository settings",
            Schema::repo()
                .opt("name", string("New repository name"))
                .opt("description", string("Repository description"))
                .opt("homepage", string("Homepage URL"))
                .opt("private", boolean("Whether the repository is private"))
                .opt("visibility", one_of(&["public", "private", "internal"], "Visibility"))
                .opt("has_issues", boolean("Enable issues"))
                .opt("has_projects", boolean("Enable projects"))
                .opt("has_wiki", boolean("Enable the wiki"))
                .opt("has_downloads", boolean("Enable downloads"))
                .opt("is_template", boolean("Make the repository a template"))
                .opt("default_branch", string("Default branch"))
                .opt("allow_squash_merge", boolean("Allow squash merges"))
                .opt("allow_merge_commit", boolean("Allow merge commits"))
                .opt("allow_rebase_merge", boolean("Allow rebase merges"))
                .opt("allow_auto_merge", boolean("Allow auto-merge"))
                .opt("delete_branch_on_merge", boolean("Delete head branches after merge"))
                .opt("allow_update_branch", boolean("Suggest updating pull request branches"))
                .opt("use_squash_pr_title_as_default", boolean("Use the PR title for squash commits"))
                .opt("squash_merge_commit_title", one_of(&["PR_TITLE", "COMMIT_OR_PR_TITLE"], "Squash commit title"))
                .opt("squash_merge_commit_message", one_of(&["PR_BODY", "COMMIT_MESSAGES", "BLANK"], "Squash commit message"))
                .opt("merge_commit_title", one_of(&["PR_TITLE", "MERGE_MESSAGE"], "Merge commit title"))
                .opt("merge_commit_message", one_of(&["PR_BODY", "PR_TITLE", "BLANK"], "Merge commit message"))
                .opt("archived", boolean("Archive the repository"))
                .opt("allow_forking", boolean("Allow private forks"))
                .opt("web_commit_signoff_required", boolean("Require sign-off on web commits")),
        ),
        GetRepositoryTopics => ("Get topics for a repository", Schema::repo()),
        ReplaceRepositoryTopics => (
            "Replace all topics for a repository",
            Schema::repo().req("topics", strings("Topic names")),
        ),
        GetRepositoryLanguages => (
            "Get programming languages used in a repository",
            Schema::repo(),
        ),
        GetCodeFrequencyStats => ("Get weekly addition and deletion stats", Schema::repo()),
        GetContributorsStats => ("Get contributor activity statistics", Schema::repo()),
        GetParticipationStats => ("Get weekly commit count statistics", Schema::repo()),
        TransferRepository => (
            "Transfer a repository to a new owner",
            Schema::repo()
                .req("new_owner", string("User or organization receiving the repository"))
                .opt("team_ids", json!({ "type": "array", "items": { "type": "integer" }, "description": "Teams to grant access" })),
        ),
        EnableAutomatedSecurityFixes => (
            "Enable automated security fixes (Dependabot)",
            Schema::repo(),
        ),
        DisableAutomatedSecurityFixes => (
            "Disable automated security fixes (Dependabot)",
            Schema::repo(),
        ),
        EnableVulnerabilityAlerts => (
            "Enable vulnerability alerts (Dependabot alerts)",
            Schema::repo(),
        ),
        DisableVulnerabilityAlerts => (
            "Disable vulnerability alerts (Dependabot alerts)",
            Schema::repo(),
        ),
        GetAuthenticatedUser => (
            "Get information about the authenticated user",
            Schema::new(),
        ),

        // Issues
        CreateIssue => (
            "Create a new issue in a repository",
            Schema::repo()
                .req("title", string("Issue title"))
                .opt("body", string("Issue body"))
                .opt("labels", strings("Labels to apply"))
                .opt("assignees", strings("Users to assign"))
                .opt("milestone", integer("Milestone number")),
        ),
        ListIssues => (
            "List issues in a repository",
            Schema::repo()
                .opt("state", state_filter())
                .opt("labels", strings("Only issues with all of these labels"))
                .opt("sort", one_of(&["created", "updated", "comments"], "Sort field"))
                .opt("direction", one_of(&["asc", "desc"], "Sort direction"))
                .paged(),
        ),
        GetIssue => (
            "Get a specific issue by number",
            Schema::repo().req("issue_number", integer("Issue number")),
        ),
        UpdateIssue => (
            "Update an existing issue",
            Schema::repo()
                .req("issue_number", integer("Issue number"))
                .opt("title", string("Issue title"))
                .opt("body", string("Issue body"))
                .opt("labels", strings("Labels to set"))
                .opt("assignees", strings("Users to assign")),
        ),
        CloseIssue => (
            "Close an issue",
            Schema::repo().req("issue_number", integer("Issue number")),
        ),
        ListIssueComments => (
            "List all comments on an issue",
            Schema::repo()
                .req("issue_number", integer("Issue number"))
                .paged(),
        ),
        CreateIssueComment => (
            "Create a comment on an issue",
            Schema::repo()
                .req("issue_number", integer("Issue number"))
                .req("body", string("Comment body")),
        ),
        UpdateIssueComment => (
            "Update an existing issue comment",
            Schema::repo()
                .req("comment_id", integer("Comment ID"))
                .req("body", string("Comment body")),
        ),
        DeleteIssueComment => (
            "Delete an issue comment",
            Schema::repo().req("comment_id", integer("Comment ID")),
        ),

        // Pull requests
        CreatePullRequest => (
            "Create a new pull request",
            Schema::repo()
                .req("title", string("Pull request title"))
                .req("head", string("Branch containing the changes"))
                .req("base", string("Branch to merge into"))
                .opt("body", string("Pull request body"))
                .opt("draft", boolean("Open as a draft"))
                .opt("maintainer_can_modify", boolean("Allow maintainers to push to the head branch")),
        ),
        ListPullRequests => (
            "List pull requests in a repository",
            Schema::repo()
                .opt("state", state_filter())
                .opt("head", string("Filter by head user:branch"))
                .opt("base", string("Filter by base branch"))
                .opt("sort", one_of(&["created", "updated", "popularity", "long-running"], "Sort field"))
                .opt("direction", one_of(&["asc", "desc"], "Sort direction"))
                .paged(),
        ),
        GetPullRequest => (
            "Get a specific pull request by number",
            Schema::repo().req("pull_number", integer("Pull request number")),
        ),
        MergePullRequest => (
            "Merge a pull request",
            Schema::repo()
                .req("pull_number", integer("Pull request number"))
                .opt("commit_message", string("Extra detail for the merge commit")),
        ),
        ListPullRequestComments => (
            "List all review comments on a pull request",
            Schema::repo()
                .req("pull_number", integer("Pull request number"))
                .paged(),
        ),
        CreatePullRequestComment => (
            "Create a review comment on a pull request",
            Schema::repo()
                .req("pull_number", integer("Pull request number"))
                .req("body", string("Comment body"))
                .opt("commit_id", string("SHA of the commit to comment on"))
                .opt("path", string("Relative file path"))
                .opt("position", integer("Line index in the diff")),
        ),

        // Labels
        ListLabels => ("List all labels in a repository", Schema::repo().paged()),
        GetLabel => (
            "Get a specific label by name",
            Schema::repo().req("name", string("Label name")),
        ),
        CreateLabel => (
            "Create a new label in a repository",
            Schema::repo()
                .req("name", string("Label name"))
                .req("color", string("Hex color without the leading #"))
                .opt("description", string("Label description")),
        ),
        UpdateLabel => (
            "Update an existing label",
            Schema::repo()
                .req("name", string("Current label name"))
                .opt("new_name", string("New label name"))
                .opt("color", string("Hex color without the leading #"))
                .opt("description", string("Label description")),
        ),
        DeleteLabel => (
            "Delete a label from a repository",
            Schema::repo().req("name", string("Label name")),
        ),

        // Milestones
        ListMilestones => (
            "List milestones in a repository",
            Schema::repo().opt("state", state_filter()).paged(),
        ),
        GetMilestone => (
            "Get a specific milestone by number",
            Schema::repo().req("milestone_number", integer("Milestone number")),
        ),
        CreateMilestone => (
            "Create a new milestone",
            Schema::repo()
                .req("title", string("Milestone title"))
                .opt("description", string("Milestone description"))
                .opt("due_on", string("Due date (ISO 8601)"))
                .opt("state", milestone_state()),
        ),
        UpdateMilestone => (
            "Update an existing milestone",
            Schema::repo()
                .req("milestone_number", integer("Milestone number"))
                .opt("title", string("Milestone title"))
                .opt("description", string("Milestone description"))
                .opt("due_on", string("Due date (ISO 8601)"))
                .opt("state", milestone_state()),
        ),
        DeleteMilestone => (
            "Delete a milestone",
            Schema::repo().req("milestone_number", integer("Milestone number")),
        ),

        // Contents
        GetFileContent => (
            "Get the contents of a file in a repository",
            Schema::repo()
                .req("path", string("File path"))
                .opt("ref", string("Branch, tag or commit SHA")),
        ),
        GetDirectoryContent => (
            "Get the contents of a directory in a repository",
            Schema::repo()
                .req("path", string("Directory path"))
                .opt("ref", string("Branch, tag or commit SHA")),
        ),
        CreateFile => (
            "Create a new file in a repository",
            Schema::repo()
                .req("path", string("File path"))
                .req("message", string("Commit message"))
                .req("content", string("File content as plain text"))
                .opt("branch", string("Target branch"))
                .opt("committer", identity("Committer identity"))
                .opt("author", identity("Author identity")),
        ),
        UpdateFile => (
            "Update an existing file in a repository",
            Schema::repo()
                .req("path", string("File path"))
                .req("message", string("Commit message"))
                .req("content", string("File content as plain text"))
                .req("sha", string("Blob SHA of the file being replaced"))
                .opt("branch", string("Target branch"))
                .opt("committer", identity("Committer identity"))
                .opt("author", identity("Author identity")),
        ),
        DeleteFile => (
            "Delete a file from a repository",
            Schema::repo()
                .req("path", string("File path"))
                .req("message", string("Commit message"))
                .req("sha", string("Blob SHA of the file being deleted"))
                .opt("branch", string("Target branch"))
                .opt("committer", identity("Committer identity"))
                .opt("author", identity("Author identity")),
        ),
        GetRepositoryTree => (
            "Get the tree structure of a repository",
            Schema::repo()
                .req("tree_sha", string("Tree SHA or branch name"))
                .opt("recursive", boolean("Walk the tree recursively")),
        ),
        DownloadRepositoryArchive => (
            "Download a repository archive (zip or tarball)",
            Schema::repo()
                .req("archive_format", one_of(&["zipball", "tarball"], "Archive format"))
                .opt("ref", string("Branch, tag or commit SHA (default HEAD)")),
        ),

        // Branches
        ListBranches => ("List all branches in a repository", Schema::repo().paged()),
        GetBranch => (
            "Get details of a specific branch",
            Schema::repo().req("branch", string("Branch name")),
        ),
        CreateBranch => (
            "Create a new branch",
            Schema::repo()
                .req("branch", string("New branch name"))
                .opt("from_branch", string("Branch to start from"))
                .opt("sha", string("Commit SHA to start from")),
        ),
        DeleteBranch => (
            "Delete a branch",
            Schema::repo().req("branch", string("Branch name")),
        ),
        MergeBranch => (
            "Merge one branch into another",
            Schema::repo()
                .req("base", string("Branch to merge into"))
                .req("head", string("Branch or SHA to merge"))
                .opt("commit_message", string("Merge commit message")),
        ),
        GetBranchProtection => (
            "Get branch protection rules",
            Schema::repo().req("branch", string("Branch name")),
        ),
        UpdateBranchProtection => (
            "Update branch protection rules",
            Schema::repo()
                .req("branch", string("Branch name"))
                .opt("required_status_checks", object("Required status checks, or null"))
                .req("enforce_admins", boolean("Enforce rules for administrators"))
                .opt("required_pull_request_reviews", object("Required reviews, or null"))
                .opt("restrictions", object("Push restrictions, or null")),
        ),
        DeleteBranchProtection => (
            "Remove branch protection rules",
            Schema::repo().req("branch", string("Branch name")),
        ),

        // Commits
        ListCommits => (
            "List commits in a repository with optional filtering",
            Schema::repo()
                .opt("sha", string("SHA or branch to start listing from"))
                .opt("path", string("Only commits touching this path"))
                .opt("author", string("GitHub login or email"))
                .opt("committer", string("GitHub login or email"))
                .opt("since", string("ISO 8601 timestamp"))
                .opt("until", string("ISO 8601 timestamp"))
                .paged(),
        ),
        GetCommit => (
            "Get details of a specific commit",
            Schema::repo().req("ref", string("Commit SHA, branch or tag")),
        ),
        CompareCommits => (
            "Compare two commits or branches",
            Schema::repo()
                .req("base", string("Base commit or branch"))
                .req("head", string("Head commit or branch")),
        ),

        // Git references and tags
        ListReferences => (
            "List git references (branches, tags, etc.)",
            Schema::repo()
                .opt("namespace", string("Ref prefix such as heads/ or tags/ (default heads/)"))
                .paged(),
        ),
        GetReference => (
            "Get a specific git reference",
            Schema::repo().req("ref", string("Reference such as heads/main")),
        ),
        CreateReference => (
            "Create a new git reference",
            Schema::repo()
                .req("ref", string("Fully qualified reference such as refs/heads/main"))
                .req("sha", string("SHA the reference points to")),
        ),
        UpdateReference => (
            "Update a git reference",
            Schema::repo()
                .req("ref", string("Reference such as heads/main"))
                .req("sha", string("New target SHA"))
                .opt("force", boolean("Allow non-fast-forward updates")),
        ),
        DeleteReference => (
            "Delete a git reference",
            Schema::repo().req("ref", string("Reference such as heads/main")),
        ),
        CreateTag => (
            "Create a new tag object",
            Schema::repo()
                .req("tag", string("Tag name"))
                .req("message", string("Tag message"))
                .req("object", string("SHA of the tagged object"))
                .req("type", one_of(&["commit", "tree", "blob"], "Type of the tagged object"))
                .opt("tagger", identity("Tagger identity")),
        ),
        GetTag => (
            "Get a tag object",
            Schema::repo().req("tag_sha", string("Tag object SHA")),
        ),

        // Releases
        ListReleases => ("List releases for a repository", Schema::repo().paged()),
        GetRelease => (
            "Get a specific release by ID",
            Schema::repo().req("release_id", integer("Release ID")),
        ),
        GetReleaseByTag => (
            "Get a release by tag name",
            Schema::repo().req("tag", string("Tag name")),
        ),
        GetLatestRelease => ("Get the latest published release", Schema::repo()),
        CreateRelease => (
            "Create a new release",
            release_fields(Schema::repo().req("tag_name", string("Tag for the release")))
                .opt("generate_release_notes", boolean("Generate name and body automatically")),
        ),
        UpdateRelease => (
            "Update an existing release",
            release_fields(
                Schema::repo()
                    .req("release_id", integer("Release ID"))
                    .opt("tag_name", string("Tag for the release")),
            ),
        ),
        DeleteRelease => (
            "Delete a release",
            Schema::repo().req("release_id", integer("Release ID")),
        ),
        ListReleaseAssets => (
            "List assets for a release",
            Schema::repo()
                .req("release_id", integer("Release ID"))
                .paged(),
        ),
        GetReleaseAsset => (
            "Get a release asset",
            Schema::repo().req("asset_id", integer("Asset ID")),
        ),
        UploadReleaseAsset => (
            "Upload an asset to a release",
            Schema::repo()
                .req("release_id", integer("Release ID"))
                .req("name", string("Asset file name"))
                .req("data", string("Asset content"))
                .opt("label", string("Display label"))
                .opt("content_type", string("Media type (default application/octet-stream)")),
        ),
        UpdateReleaseAsset => (
            "Update a release asset",
            Schema::repo()
                .req("asset_id", integer("Asset ID"))
                .opt("name", string("Asset file name"))
                .opt("label", string("Display label")),
        ),
        DeleteReleaseAsset => (
            "Delete a release asset",
            Schema::repo().req("asset_id", integer("Asset ID")),
        ),
        GenerateReleaseNotes => (
            "Generate release notes automatically",
            Schema::repo()
                .req("tag_name", string("Tag for the release"))
                .opt("target_commitish", string("Commitish the tag is created from"))
                .opt("previous_tag_name", string("Tag to compare against"))
                .opt("configuration_file_path", string("Path to a release configuration file")),
        ),

        // Actions
        ListWorkflows => ("List workflows for a repository", Schema::repo().paged()),
        GetWorkflow => (
            "Get a workflow by ID or filename",
            Schema::repo().req("workflow_id", workflow_id()),
        ),
        ListWorkflowRuns => (
            "List workflow runs for a repository or specific workflow",
            Schema::repo()
                .opt("workflow_id", workflow_id())
                .opt("actor", string("Login of the user who triggered the run"))
                .opt("branch", string("Branch name"))
                .opt("event", string("Triggering event"))
                .opt("status", string("Run status or conclusion"))
                .paged()
                .opt("created", string("Date range filter"))
                .opt("exclude_pull_requests", boolean("Omit pull requests from the result"))
                .opt("check_suite_id", integer("Check suite ID"))
                .opt("head_sha", string("Head commit SHA")),
        ),
        GetWorkflowRun => (
            "Get a workflow run",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        RerunWorkflow => (
            "Re-run a workflow",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        RerunFailedJobs => (
            "Re-run failed jobs in a workflow",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        CancelWorkflowRun => (
            "Cancel a workflow run",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        DeleteWorkflowRun => (
            "Delete a workflow run",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        ListWorkflowJobs => (
            "List jobs for a workflow run",
            Schema::repo()
                .req("run_id", integer("Workflow run ID"))
                .opt("filter", one_of(&["latest", "all"], "Which attempts to include"))
                .paged(),
        ),
        GetWorkflowJob => (
            "Get a workflow job",
            Schema::repo().req("job_id", integer("Job ID")),
        ),
        DownloadJobLogs => (
            "Download logs for a workflow job",
            Schema::repo().req("job_id", integer("Job ID")),
        ),
        DownloadWorkflowRunLogs => (
            "Download logs for a workflow run",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        DeleteWorkflowRunLogs => (
            "Delete logs for a workflow run",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),
        ListArtifacts => (
            "List artifacts for a repository or workflow run",
            Schema::repo()
                .opt("run_id", integer("Workflow run ID"))
                .paged()
                .opt("name", string("Artifact name")),
        ),
        GetArtifact => (
            "Get an artifact",
            Schema::repo().req("artifact_id", integer("Artifact ID")),
        ),
        DownloadArtifact => (
            "Download an artifact as a zip file",
            Schema::repo().req("artifact_id", integer("Artifact ID")),
        ),
        DeleteArtifact => (
            "Delete an artifact",
            Schema::repo().req("artifact_id", integer("Artifact ID")),
        ),
        CreateWorkflowDispatch => (
            "Trigger a workflow dispatch event",
            Schema::repo()
                .req("workflow_id", workflow_id())
                .req("ref", string("Branch or tag to run on"))
                .opt("inputs", object("Workflow inputs")),
        ),
        GetWorkflowUsage => (
            "Get workflow usage statistics",
            Schema::repo().req("workflow_id", workflow_id()),
        ),
        GetWorkflowRunUsage => (
            "Get workflow run usage statistics",
            Schema::repo().req("run_id", integer("Workflow run ID")),
        ),

        // Search
        SearchRepositories => (
            "Search for repositories using GitHub query syntax",
            search(&["stars", "forks", "help-wanted-issues", "updated"]),
        ),
        SearchCode => (
            "Search for code across GitHub repositories",
            search(&["indexed"]),
        ),
        SearchCommits => (
            "Search for commits across GitHub",
            search(&["author-date", "committer-date"]),
        ),
        SearchIssues => (
            "Search for issues and pull requests",
            search(&["comments", "reactions", "created", "updated"]),
        ),
        SearchUsers => (
            "Search for users on GitHub",
            search(&["followers", "repositories", "joined"]),
        ),
        SearchTopics => (
            "Search for topics on GitHub",
            Schema::new().req("q", string("Search query")).paged(),
        ),
        SearchLabels => (
            "Search for labels in a repository",
            Schema::new()
                .req("repository_id", integer("Repository ID"))
                .req("q", string("Search query"))
                .opt("sort", one_of(&["created", "updated"], "Sort field"))
                .opt("order", one_of(&["asc", "desc"], "Sort order"))
                .paged(),
        ),

        // Webhooks
        ListWebhooks => ("List all webhooks for a repository", Schema::repo().paged()),
        GetWebhook => (
            "Get a specific webhook by ID",
            Schema::repo().req("hook_id", integer("Webhook ID")),
        ),
        CreateWebhook => (
            "Create a new webhook for a repository",
            Schema::repo()
                .req(
                    "config",
                    json!({
                        "type": "object",
                        "description": "Delivery configuration",
                        "properties": {
                            "url": { "type": "string" },
                            "content_type": { "type": "string", "enum": ["json", "form"] },
                            "secret": { "type": "string" },
                            "insecure_ssl": { "type": "string" }
                        },
                        "required": ["url"]
                    }),
                )
                .opt("events", strings("Events that trigger the hook (default push)"))
                .opt("active", boolean("Deliver notifications (default true)")),
        ),
        UpdateWebhook => (
            "Update an existing webhook",
            Schema::repo()
                .req("hook_id", integer("Webhook ID"))
                .opt("config", object("Delivery configuration"))
                .opt("events", strings("Replace the subscribed events"))
                .opt("add_events", strings("Events to add"))
                .opt("remove_events", strings("Events to remove"))
                .opt("active", boolean("Deliver notifications")),
        ),
        DeleteWebhook => (
            "Delete a webhook",
            Schema::repo().req("hook_id", integer("Webhook ID")),
        ),
        PingWebhook => (
            "Trigger a ping event to be sent to the webhook",
            Schema::repo().req("hook_id", integer("Webhook ID")),
        ),
        TestWebhook => (
            "Trigger a test push event to be sent to the webhook",
            Schema::repo().req("hook_id", integer("Webhook ID")),
        ),
        ListWebhookDeliveries => (
            "List deliveries for a webhook",
            Schema::repo()
                .req("hook_id", integer("Webhook ID"))
                .opt("per_page", integer("Results per page (max 100)"))
                .opt("cursor", string("Pagination cursor"))
                .opt("redelivery", boolean("Only redeliveries")),
        ),
        GetWebhookDelivery => (
            "Get a specific webhook delivery",
            Schema::repo()
                .req("hook_id", integer("Webhook ID"))
                .req("delivery_id", integer("Delivery ID")),
        ),
        RedeliverWebhook => (
            "Redeliver a webhook delivery",
            Schema::repo()
                .req("hook_id", integer("Webhook ID"))
                .req("delivery_id", integer("Delivery ID")),
        ),

        // Collaborators and teams
        ListCollaborators => (
            "List collaborators for a repository",
            Schema::repo()
                .opt("affiliation", one_of(&["outside", "direct", "all"], "Affiliation filter"))
                .opt("permission", one_of(&["pull", "triage", "push", "maintain", "admin"], "Permission filter"))
                .paged(),
        ),
        CheckCollaborator => (
            "Check if a user is a collaborator",
            Schema::repo().req("username", string("GitHub username")),
        ),
        AddCollaborator => (
            "Add a collaborator to a repository",
            Schema::repo()
                .req("username", string("GitHub username"))
                .opt("permission", permission()),
        ),
        RemoveCollaborator => (
            "Remove a collaborator from a repository",
            Schema::repo().req("username", string("GitHub username")),
        ),
        GetCollaboratorPermission => (
            "Get permission level for a collaborator",
            Schema::repo().req("username", string("GitHub username")),
        ),
        ListRepositoryInvitations => (
            "List pending repository invitations",
            Schema::repo().paged(),
        ),
        DeleteRepositoryInvitation => (
            "Delete a repository invitation",
            Schema::repo().req("invitation_id", integer("Invitation ID")),
        ),
        ListRepositoryTeams => (
            "List teams with access to a repository",
            Schema::repo().paged(),
        ),
        CheckTeamPermission => (
            "Check team permission for a repository",
            Schema::repo().req("team_slug", string("Team slug")),
        ),
        AddRepositoryTeam => (
            "Add or update team access to a repository",
            Schema::repo()
                .req("team_slug", string("Team slug"))
                .opt("permission", permission()),
        ),
        RemoveRepositoryTeam => (
            "Remove team access from a repository",
            Schema::repo().req("team_slug", string("Team slug")),
        ),
    }
}

fn release_fields(schema: Schema) -> Schema {
    schema
        .opt("target_commitish", string("Commitish the tag is created from"))
        .opt("name", string("Release name"))
        .opt("body", string("Release notes"))
        .opt("draft", boolean("Unpublished draft"))
        .opt("prerelease", boolean("Mark as prerelease"))
        .opt("discussion_category_name", string("Start a discussion in this category"))
        .opt("make_latest", one_of(&["true", "false", "legacy"], "Mark as latest release"))
}

fn search(sort_fields: &[&str]) -> Schema {
    Schema::new()
        .req("q", string("Search query"))
        .opt("sort", one_of(sort_fields, "Sort field"))
        .opt("order", one_of(&["asc", "desc"], "Sort order"))
        .paged()
}

fn permission() -> Value {
    one_of(&["pull", "triage", "push", "maintain", "admin"], "Permission to grant")
}

/// All descriptors, in `Method::ALL` order.
pub fn tool_descriptors() -> &'static [ToolDescriptor] {
    static CATALOG: OnceLock<Vec<ToolDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        Method::ALL
            .iter()
            .map(|&m| {
                let (description, schema) = describe(m);
                ToolDescriptor {
                    name: m.name().to_string(),
                    description: description.to_string(),
                    parameters: schema.build(),
                }
            })
            .collect()
    })
}

pub fn descriptor(method: Method) -> &'static ToolDescriptor {
    // Catalog is built from Method::ALL, which lists variants in declaration order.
    &tool_descriptors()[method as usize]
}

/// Check `params` against the method's schema: required properties present and
/// non-null, declared types respected. Unknown properties are ignored.
pub fn validate_params(method: Method, params: &Map<String, Value>) -> Result<(), ApiError> {
    let schema = &descriptor(method).parameters;

    let missing: Vec<&str> = schema
        .required
        .iter()
        .filter(|name| params.get(name.as_str()).map_or(true, Value::is_null))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(
            ApiError::invalid_params(format!(
                "Missing required parameter(s): {}",
                missing.join(", ")
            ))
            .with_details(json!({ "missing": missing })),
        );
    }

    for (name, value) in params {
        if value.is_null() {
            continue;
        }
        let Some(expected) = schema.properties.get(name).and_then(|p| p.get("type")) else {
            continue;
        };
        if !matches_type(expected, value) {
            return Err(ApiError::invalid_params(format!(
                "Invalid type for parameter '{}': expected {}",
                name,
                type_label(expected)
            ))
            .with_details(json!({ "field": name, "expected": expected })));
        }
    }
    Ok(())
}

fn matches_type(expected: &Value, value: &Value) -> bool {
    match expected {
        Value::String(t) => matches_named_type(t, value),
        Value::Array(ts) => ts
            .iter()
            .filter_map(Value::as_str)
            .any(|t| matches_named_type(t, value)),
        _ => true,
    }
}

fn matches_named_type(t: &str, value: &Value) -> bool {
    match t {
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn type_label(expected: &Value) -> String {
    match expected {
        Value::String(t) => t.clone(),
        Value::Array(ts) => ts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("params must be an object"),
        }
    }

    #[test]
    fn one_descriptor_per_method() {
        let tools = tool_descriptors();
        assert_eq!(tools.len(), Method::ALL.len());
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len(), "duplicate tool names");
        for m in Method::ALL {
            assert_eq!(descriptor(*m).name, m.name());
        }
    }

    #[test]
    fn required_fields_are_declared_properties() {
        for tool in tool_descriptors() {
            assert_eq!(tool.parameters.kind, "object");
            assert!(!tool.description.is_empty(), "{} has no description", tool.name);
            for field in &tool.parameters.required {
                assert!(
                    tool.parameters.properties.contains_key(field),
                    "{} requires undeclared {}",
                    tool.name,
                    field
                );
            }
        }
    }

    #[test]
    fn catalog_serializes_with_json_schema_keys() {
        let v = serde_json::to_value(descriptor(Method::CreateIssue)).unwrap();
        assert_eq!(v["name"], "github_create_issue");
        assert_eq!(v["parameters"]["type"], "object");
        assert_eq!(v["parameters"]["required"], json!(["owner", "repo", "title"]));
    }

    #[test]
    fn missing_required_params_are_listed() {
        let err = validate_params(Method::CreateIssue, &params(json!({ "owner": "o", "title": null })))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
        assert_eq!(err.details(), Some(&json!({ "missing": ["repo", "title"] })));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = validate_params(
            Method::GetIssue,
            &params(json!({ "owner": "o", "repo": "r", "issue_number": "7" })),
        )
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
        assert!(err.message().contains("issue_number"));

        assert!(validate_params(
            Method::GetIssue,
            &params(json!({ "owner": "o", "repo": "r", "issue_number": 1.5 })),
        )
        .is_err());
    }

    #[test]
    fn union_types_and_unknown_fields_pass() {
        for id in [json!(42), json!("ci.yml")] {
            let p = params(json!({ "owner": "o", "repo": "r", "workflow_id": id, "extra": true }));
            assert!(validate_params(Method::GetWorkflow, &p).is_ok());
        }
        assert!(validate_params(
            Method::GetWorkflow,
            &params(json!({ "owner": "o", "repo": "r", "workflow_id": [] })),
        )
        .is_err());
    }

    #[test]
    fn no_param_methods_accept_empty_params() {
        assert!(validate_params(Method::GetAuthenticatedUser, &Map::new()).is_ok());
    }
}
