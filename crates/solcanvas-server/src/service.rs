//! EditorService: the single coordinator between HTTP handlers and the
//! core/storage/sandbox crates.
//!
//! All business logic flows through [`EditorService`]. Handlers are thin
//! wrappers that delegate to these methods.

use std::path::PathBuf;

use solcanvas_core::canvas;
use solcanvas_core::form;
use solcanvas_core::layout::{apply_default_layout, snap_to_placed};
use solcanvas_core::template::{self, TemplateInfo};
use solcanvas_core::{
    components_to_contract, contract_to_components, ComponentGraph, ComponentId, ComponentKind,
    ContractMetadata, DragPayload, DragSession, DropOutcome, EthereumContract, FieldSpec,
    NodeView, Position, RenderNode, Viewport,
};
use solcanvas_sandbox::scaffold::{self, export_contract, project_tree};
use solcanvas_sandbox::{LocalSandbox, RetryPolicy, RetryingSandbox, Sandbox, SandboxError};
use solcanvas_storage::{ProjectId, ProjectStore, ProjectSummary};

use crate::error::ApiError;
use crate::schema::editor::{EditorSummary, ExportResponse, UpdateNodeRequest};
use crate::schema::projects::{AddContractRequest, AddContractResponse};

/// The contract currently loaded into the canvas.
#[derive(Debug, Clone)]
struct OpenContract {
    project: ProjectId,
    project_name: String,
    metadata: ContractMetadata,
}

/// The central service owning the editor session: the component graph of
/// the open contract, the drag session, and the project store.
pub struct EditorService {
    /// Persistence backend.
    store: Box<dyn ProjectStore + Send>,
    /// Directory that scaffolded projects are exported under.
    sandbox_root: PathBuf,
    retry: RetryPolicy,
    /// The canvas of the open contract (empty when none is open).
    graph: ComponentGraph,
    drag: DragSession,
    open: Option<OpenContract>,
}

impl EditorService {
    /// Creates the service and reopens the contract that was current when
    /// the store was last used.
    pub fn new(
        store: Box<dyn ProjectStore + Send>,
        sandbox_root: impl Into<PathBuf>,
    ) -> Result<Self, ApiError> {
        let mut service = EditorService {
            store,
            sandbox_root: sandbox_root.into(),
            retry: RetryPolicy::default(),
            graph: ComponentGraph::new(),
            drag: DragSession::new(),
            open: None,
        };
        service.restore_current()?;
        Ok(service)
    }

    /// Overrides the retry policy used for sandbox writes.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn restore_current(&mut self) -> Result<(), ApiError> {
        let (Some(project), Some(contract)) = (
            self.store.get_current_project()?,
            self.store.get_current_contract()?,
        ) else {
            return Ok(());
        };
        match contract_to_components(&contract) {
            Ok(graph) => {
                tracing::info!(
                    project = project.id.0,
                    contract = %contract.name(),
                    components = graph.len(),
                    "restored editor session"
                );
                self.graph = graph;
                self.open = Some(OpenContract {
                    project: project.id,
                    project_name: project.name,
                    metadata: contract.metadata,
                });
            }
            Err(err) => {
                tracing::warn!(
                    project = project.id.0,
                    contract = %contract.name(),
                    error = %err,
                    "could not restore current contract, starting empty"
                );
            }
        }
        Ok(())
    }

    fn require_open(&self) -> Result<&OpenContract, ApiError> {
        self.open
            .as_ref()
            .ok_or_else(|| ApiError::Conflict("no contract is open".to_string()))
    }

    fn close(&mut self) {
        if self.graph.is_dirty() {
            tracing::warn!("discarding unsaved canvas changes");
        }
        self.graph.clear();
        self.graph.mark_clean();
        self.drag.cancel();
        self.open = None;
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>, ApiError> {
        Ok(self.store.list_projects()?)
    }

    pub fn create_project(&mut self, name: &str) -> Result<ProjectId, ApiError> {
        Ok(self.store.create_project(name)?)
    }

    /// Deletes a project. Closes the canvas if it showed one of its contracts.
    pub fn delete_project(&mut self, id: ProjectId) -> Result<(), ApiError> {
        self.store.delete_project(id)?;
        if self.open.as_ref().is_some_and(|open| open.project == id) {
            self.close();
        }
        Ok(())
    }

    /// Adds a contract to a project without opening it.
    pub fn add_contract(
        &mut self,
        project: ProjectId,
        req: AddContractRequest,
    ) -> Result<AddContractResponse, ApiError> {
        let contract = match (req.contract, req.name) {
            (Some(contract), _) => contract,
            (None, Some(name)) => EthereumContract::new(ContractMetadata::new(name)),
            (None, None) => {
                return Err(ApiError::BadRequest(
                    "either 'name' or 'contract' is required".to_string(),
                ))
            }
        };
        // Reject contracts that could never be opened.
        let graph = contract_to_components(&contract)?;
        self.store.add_contract_to_project(project, &contract)?;
        Ok(AddContractResponse {
            project,
            name: contract.metadata.name,
            components: graph.len(),
        })
    }

    /// Loads a stored contract into the canvas and makes it current.
    ///
    /// Unsaved changes to the previously open contract are discarded.
    pub fn open_contract(
        &mut self,
        project: ProjectId,
        name: &str,
    ) -> Result<EditorSummary, ApiError> {
        let project_name = self.store.get_project(project)?.name;
        let contract = self.store.get_contract(project, name)?;
        let graph = contract_to_components(&contract)?;
        self.store.set_current_contract(project, name)?;

        self.close();
        self.graph = graph;
        self.open = Some(OpenContract {
            project,
            project_name,
            metadata: contract.metadata,
        });
        tracing::info!(project = project.0, contract = name, "opened contract");
        Ok(self.summary())
    }

    // -----------------------------------------------------------------------
    // Palette
    // -----------------------------------------------------------------------

    pub fn templates(&self) -> Vec<TemplateInfo> {
        template::catalog()
    }

    /// Form layout for a kind given by its slug (e.g. `external-call`).
    pub fn form(&self, slug: &str) -> Result<(ComponentKind, &'static [FieldSpec]), ApiError> {
        let kind = ComponentKind::from_slug(slug)
            .ok_or_else(|| ApiError::NotFound(format!("unknown component kind '{}'", slug)))?;
        Ok((kind, form::fields(kind)))
    }

    // -----------------------------------------------------------------------
    // Canvas queries
    // -----------------------------------------------------------------------

    pub fn summary(&self) -> EditorSummary {
        EditorSummary {
            project: self.open.as_ref().map(|open| open.project),
            contract: self.open.as_ref().map(|open| open.metadata.name.clone()),
            dirty: self.graph.is_dirty(),
            components: self.graph.len(),
            connections: self.graph.connections().len(),
            dragging: self.drag.is_dragging(),
            nodes: self.graph.views(),
            issues: form::validate_graph(&self.graph),
        }
    }

    pub fn render(&self, viewport: &Viewport) -> Vec<RenderNode> {
        canvas::render(&self.graph, viewport)
    }

    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    // -----------------------------------------------------------------------
    // Drag protocol
    // -----------------------------------------------------------------------

    pub fn drag_start(&mut self, payload: DragPayload, pointer: Position) -> Result<(), ApiError> {
        self.require_open()?;
        self.drag.start(&self.graph, payload, pointer)?;
        Ok(())
    }

    pub fn drag_move(&mut self, pointer: Position) -> Result<Position, ApiError> {
        Ok(self.drag.move_to(pointer)?)
    }

    pub fn drag_end(&mut self, drop: Option<Position>) -> Result<DropOutcome, ApiError> {
        Ok(self.drag.end(&mut self.graph, drop)?)
    }

    pub fn drag_cancel(&mut self) -> DropOutcome {
        self.drag.cancel()
    }

    // -----------------------------------------------------------------------
    // Node and connection edits
    // -----------------------------------------------------------------------

    /// Applies a node edit. Nothing changes unless every part is valid.
    pub fn update_node(
        &mut self,
        id: &ComponentId,
        req: UpdateNodeRequest,
    ) -> Result<NodeView, ApiError> {
        self.require_open()?;
        let node = self
            .graph
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("component not found: '{}'", id)))?;
        let width = req.width.unwrap_or(node.width);
        let height = req.height.unwrap_or(node.height);
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ApiError::BadRequest(
                "width and height must be positive".to_string(),
            ));
        }
        if let Some(position) = req.position {
            if !(position.x.is_finite() && position.y.is_finite()) {
                return Err(ApiError::BadRequest("position must be finite".to_string()));
            }
        }

        if let Some(data) = req.data {
            form::apply(&mut self.graph, id, data)?;
        }
        if let Some(position) = req.position {
            self.graph.reposition(id, snap_to_placed(position))?;
        }
        if req.width.is_some() || req.height.is_some() {
            self.graph.resize(id, width, height)?;
        }
        Ok(self.graph.view(id)?)
    }

    /// Removes a node and its connections. A drag of that node is abandoned.
    pub fn delete_node(&mut self, id: &ComponentId) -> Result<(), ApiError> {
        self.require_open()?;
        self.graph.remove(id)?;
        if matches!(self.drag.payload(), Some(DragPayload::Existing { id: dragged }) if dragged == id)
        {
            self.drag.cancel();
        }
        tracing::debug!(%id, "deleted component");
        Ok(())
    }

    pub fn connect(&mut self, from: &ComponentId, to: &ComponentId) -> Result<bool, ApiError> {
        self.require_open()?;
        Ok(self.graph.connect(from, to)?)
    }

    pub fn disconnect(&mut self, from: &ComponentId, to: &ComponentId) -> Result<bool, ApiError> {
        self.require_open()?;
        Ok(self.graph.disconnect(from, to)?)
    }

    /// Gives every unplaced node a default grid slot.
    pub fn apply_layout(&mut self) -> Result<usize, ApiError> {
        self.require_open()?;
        Ok(apply_default_layout(&mut self.graph))
    }

    // -----------------------------------------------------------------------
    // Persistence and export
    // -----------------------------------------------------------------------

    /// The open canvas as a contract description.
    pub fn current_contract(&self) -> Result<EthereumContract, ApiError> {
        let open = self.require_open()?;
        Ok(components_to_contract(&self.graph, &open.metadata))
    }

    /// Writes the canvas back to the store. Returns whether stored content
    /// changed. The session stays dirty if the write fails.
    pub fn save(&mut self) -> Result<bool, ApiError> {
        let contract = self.current_contract()?;
        let project = self.require_open()?.project;
        let changed = self.store.update_contract(project, &contract)?;
        self.graph.mark_clean();
        tracing::info!(project = project.0, contract = %contract.name(), changed, "saved contract");
        Ok(changed)
    }

    /// Snapshots what an export needs so the session lock can be released
    /// before any file is written.
    pub fn prepare_export(&self) -> Result<ExportJob, ApiError> {
        let open = self.require_open()?;
        Ok(ExportJob {
            directory: self.sandbox_root.join(scaffold::package_name(&open.project_name)),
            project_name: open.project_name.clone(),
            contract: components_to_contract(&self.graph, &open.metadata),
            retry: self.retry,
        })
    }
}

/// A pending export of one contract into its project's sandbox directory.
#[derive(Debug, Clone)]
pub struct ExportJob {
    directory: PathBuf,
    project_name: String,
    contract: EthereumContract,
    retry: RetryPolicy,
}

impl ExportJob {
    /// Scaffolds the project directory on first export, then writes the
    /// contract description into it.
    pub async fn run(self) -> Result<ExportResponse, ApiError> {
        let sandbox =
            RetryingSandbox::with_policy(LocalSandbox::new(&self.directory), self.retry);
        match sandbox.read_file("package.json").await {
            Ok(_) => {}
            Err(SandboxError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                sandbox.mount(&project_tree(&self.project_name)).await?;
                tracing::info!(directory = %self.directory.display(), "scaffolded project");
            }
            Err(err) => return Err(err.into()),
        }
        let file = export_contract(&sandbox, &self.contract).await?;
        Ok(ExportResponse {
            directory: self.directory.display().to_string(),
            file,
        })
    }
}
