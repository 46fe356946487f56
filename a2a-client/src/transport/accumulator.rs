use a2a_core::{
    Artifact, ClientEvent, StreamResult, Task, TaskArtifactUpdateEvent, TaskState,
    TaskStatusUpdateEvent, UpdateEvent,
};

/// Folds status and artifact updates into a task snapshot, so that every
/// task-related event handed to the engine carries the whole task.
#[derive(Debug, Default)]
pub struct TaskAccumulator {
    task: Option<Task>,
}

impl TaskAccumulator {
    pub fn apply(&mut self, result: StreamResult) -> ClientEvent {
        match result {
            StreamResult::Task(task) => {
                self.task = Some(task.clone());
                ClientEvent::Task(task)
            }
            StreamResult::Message(message) => ClientEvent::Other(message),
            StreamResult::Update(UpdateEvent::TaskStatusUpdate(update)) => {
                ClientEvent::TaskUpdate(self.apply_status(update))
            }
            StreamResult::Update(UpdateEvent::TaskArtifactUpdate(update)) => {
                ClientEvent::TaskUpdate(self.apply_artifact(update))
            }
        }
    }

    pub fn current(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    fn apply_status(&mut self, update: TaskStatusUpdateEvent) -> Task {
        let task = self.task_for(&update.task_id, update.context_id);
        task.status = update.status;
        task.clone()
    }

    fn apply_artifact(&mut self, update: TaskArtifactUpdateEvent) -> Task {
        let task = self.task_for(&update.task_id, update.context_id);
        let artifacts = task.artifacts.get_or_insert_with(Vec::new);
        merge_artifact(artifacts, update.artifact, update.append);
        task.clone()
    }

    /// The tracked task, or a fresh `submitted` one if the update names another task.
    fn task_for(&mut self, task_id: &str, context_id: Option<String>) -> &mut Task {
        let matches = self.task.as_ref().is_some_and(|task| task.id == task_id);
        if !matches {
            let mut task = Task::new(task_id, TaskState::Submitted);
            task.context_id = context_id;
            self.task = Some(task);
        }
        self.task.get_or_insert_with(|| Task::new(task_id, TaskState::Submitted))
    }
}

fn merge_artifact(artifacts: &mut Vec<Artifact>, artifact: Artifact, append: bool) {
    match artifacts.iter_mut().find(|existing| existing.artifact_id == artifact.artifact_id) {
        Some(existing) if append => existing.parts.extend(artifact.parts),
        Some(existing) => *existing = artifact,
        None => artifacts.push(artifact),
    }
}
