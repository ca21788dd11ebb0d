use crate::model::{Project, Task, TaskId, TaskStatus};
use crate::service::Client;

use super::feedback::Feedback;
use super::listing::Listing;

/// One project's tasks, partitioned into status columns at render time
#[derive(Debug)]
pub struct Board {
    pub project: Project,
    pub tasks: Listing<Task>,
}

impl Board {
    pub fn new(project: Project) -> Self {
        Board {
            project,
            tasks: Listing::default(),
        }
    }

    pub fn reload(&mut self, client: &Client, feedback: &mut Feedback) -> bool {
        let id = self.project.id.clone();
        self.tasks
            .load("tasks", feedback, || client.backend.list_tasks(&id))
    }

    /// Tasks grouped by status, in `TaskStatus::ALL` order. Each task lands in
    /// exactly one column; order within a column follows the fetched list.
    pub fn columns(&self) -> [Vec<&Task>; 3] {
        let mut columns: [Vec<&Task>; 3] = Default::default();
        for task in &self.tasks.items {
            columns[task.status.column()].push(task);
        }
        columns
    }

    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks
            .items
            .iter()
            .filter(|t| t.status == status)
            .collect()
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.items.iter().find(|t| &t.id == id)
    }

    /// Take a refreshed copy of the project header (e.g. after an edit)
    pub fn update_project(&mut self, projects: &[Project]) {
        if let Some(p) = projects.iter().find(|p| p.id == self.project.id) {
            self.project = p.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::Harness;
    use pretty_assertions::assert_eq;

    fn names(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn tasks_partition_into_three_columns() {
        let h = Harness::new();
        let web = h.project("Web");
        h.task(&web, "a", TaskStatus::Todo);
        h.task(&web, "b", TaskStatus::Completed);
        h.task(&web, "c", TaskStatus::InProgress);
        h.task(&web, "d", TaskStatus::Todo);

        let mut board = Board::new(web);
        let mut feedback = Feedback::new();
        assert!(board.reload(&h.client, &mut feedback));

        let [todo, doing, done] = board.columns();
        assert_eq!(names(&todo), vec!["a", "d"]);
        assert_eq!(names(&doing), vec!["c"]);
        assert_eq!(names(&done), vec!["b"]);
        assert_eq!(names(&board.column(TaskStatus::Todo)), vec!["a", "d"]);
    }

    #[test]
    fn board_only_shows_its_project() {
        let h = Harness::new();
        let web = h.project("Web");
        let mobile = h.project("Mobile");
        h.task(&web, "web task", TaskStatus::Todo);
        h.task(&mobile, "mobile task", TaskStatus::Todo);

        let mut board = Board::new(mobile);
        let mut feedback = Feedback::new();
        board.reload(&h.client, &mut feedback);
        assert_eq!(board.tasks.len(), 1);
        assert_eq!(board.tasks.items[0].name, "mobile task");
    }

    #[test]
    fn failed_reload_keeps_stale_tasks() {
        let h = Harness::new();
        let web = h.project("Web");
        h.task(&web, "a", TaskStatus::Todo);
        let mut board = Board::new(web);
        let mut feedback = Feedback::new();
        board.reload(&h.client, &mut feedback);

        h.switches.fail_backend.set(true);
        assert!(!board.reload(&h.client, &mut feedback));
        assert_eq!(board.tasks.len(), 1);
        assert_eq!(feedback.latest().unwrap().message, "Failed to load tasks");
    }
}
