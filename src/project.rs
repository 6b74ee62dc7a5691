use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canvas::{Layer, LayerKind, BASE_LAYER_NAME};
use crate::error::Result;

// ============================================================================
// PROJECT METADATA
// The gallery's view of a manuscript: title, sync age, polish status and
// the layer roster. Pixels live in the stack, not here.
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Draft,
    #[serde(rename = "Ready for Polish")]
    ReadyForPolish,
    Polished,
}

/// Serializable face of a layer, as it appears in the gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    pub visible: bool,
    pub kind: LayerKind,
}

impl LayerInfo {
    pub fn new(name: impl Into<String>, visible: bool, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            visible,
            kind,
        }
    }

    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            name: layer.name.clone(),
            visible: layer.visible,
            kind: layer.kind,
        }
    }
}

/// Single manuscript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    /// Thumbnail data string, or a remote preview URL for seeded samples.
    pub image_url: String,
    /// Free-form age label shown in the gallery ("2 mins ago", "just now").
    pub last_synced: String,
    pub status: ProjectStatus,
    pub layers: Vec<LayerInfo>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            image_url: String::new(),
            last_synced: "just now".to_string(),
            status: ProjectStatus::Draft,
            layers: vec![LayerInfo::new(BASE_LAYER_NAME, true, LayerKind::Sketch)],
        }
    }
}

/// In-memory collection backing the gallery screen.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectStore {
    projects: Vec<Project>,
    #[serde(skip)]
    untitled_counter: usize,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The studio's three sample manuscripts, as shipped on first run.
    pub fn with_samples() -> Self {
        let mut store = Self::new();
        store.projects.push(sample(
            "Autumn Gala Gown",
            "https://picsum.photos/seed/fashion1/800/1200",
            "2 mins ago",
            ProjectStatus::ReadyForPolish,
            vec![
                LayerInfo::new("Original Sketch", true, LayerKind::Sketch),
                LayerInfo::new("AI Polish Preview", false, LayerKind::AiPolish),
            ],
        ));
        store.projects.push(sample(
            "Avant-Garde Structure",
            "https://picsum.photos/seed/fashion2/800/1200",
            "1 hour ago",
            ProjectStatus::ReadyForPolish,
            vec![LayerInfo::new("Structural Sketch", true, LayerKind::Sketch)],
        ));
        store.projects.push(sample(
            "Minimalist Silk Set",
            "https://picsum.photos/seed/fashion3/800/1200",
            "Yesterday",
            ProjectStatus::Polished,
            vec![
                LayerInfo::new("Base Sketch", true, LayerKind::Sketch),
                LayerInfo::new("Silk Rendering", true, LayerKind::AiPolish),
            ],
        ));
        store
    }

    /// Adds a fresh draft and returns its id. An empty title falls back to
    /// "Untitled-N".
    pub fn create(&mut self, title: &str) -> Uuid {
        let title = if title.trim().is_empty() {
            self.untitled_counter += 1;
            format!("Untitled-{}", self.untitled_counter)
        } else {
            title.to_string()
        };
        let project = Project::new(title);
        let id = project.id;
        self.projects.push(project);
        id
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }

    /// Stamps the sync age back to "just now". Returns false for an unknown
    /// project, which the gallery treats as a stale click.
    pub fn refresh_sync(&mut self, id: Uuid) -> bool {
        match self.find_mut(id) {
            Some(project) => {
                project.last_synced = "just now".to_string();
                true
            }
            None => false,
        }
    }

    /// Stores a fresh thumbnail and promotes a draft to ready. Statuses past
    /// draft are left alone.
    pub fn set_thumbnail(&mut self, id: Uuid, data_url: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(project) => {
                project.image_url = data_url.into();
                if project.status == ProjectStatus::Draft {
                    project.status = ProjectStatus::ReadyForPolish;
                }
                true
            }
            None => false,
        }
    }

    /// JSON snapshot of the gallery, the hand-off format for display sync.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.projects)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let projects: Vec<Project> = serde_json::from_str(json)?;
        Ok(Self {
            projects,
            untitled_counter: 0,
        })
    }
}

fn sample(
    title: &str,
    image_url: &str,
    last_synced: &str,
    status: ProjectStatus,
    layers: Vec<LayerInfo>,
) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: title.to_string(),
        image_url: image_url.to_string(),
        last_synced: last_synced.to_string(),
        status,
        layers,
    }
}
