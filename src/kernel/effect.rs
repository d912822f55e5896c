/// A collaborator call requested by the store. The runtime answers each
/// one with exactly one completion [`Action`](super::Action).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListProjects,
    ListFiles {
        project: String,
    },
    ReadFile {
        project: String,
        path: String,
    },
    WriteFile {
        project: String,
        path: String,
        text: String,
    },
    /// Writes empty content for a brand new file.
    CreateFile {
        project: String,
        path: String,
    },
    DeleteFile {
        project: String,
        path: String,
    },
    CreateProject {
        name: String,
    },
    DeleteProject {
        name: String,
    },
    Execute {
        project: String,
        path: String,
        stdin: String,
    },
}

impl Effect {
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::ListProjects => "list_projects",
            Effect::ListFiles { .. } => "list_files",
            Effect::ReadFile { .. } => "read_file",
            Effect::WriteFile { .. } => "write_file",
            Effect::CreateFile { .. } => "create_file",
            Effect::DeleteFile { .. } => "delete_file",
            Effect::CreateProject { .. } => "create_project",
            Effect::DeleteProject { .. } => "delete_project",
            Effect::Execute { .. } => "execute",
        }
    }
}
