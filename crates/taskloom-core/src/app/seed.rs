//! Default task set for a fresh start.

use chrono::{Days, NaiveDate};

use crate::domain::Task;

/// Four demo tasks with deadlines relative to `today`. Tasks 3 and 4 wait
/// on 1 and 2 respectively.
pub fn default_tasks(today: NaiveDate) -> Vec<Task> {
    let due = |days: u64| today.checked_add_days(Days::new(days)).unwrap_or(today);
    vec![
        Task::new(1, "Analyze data from the quarterly datasets", 1).with_deadline(due(1)),
        Task::new(2, "Automation of the nightly system backup", 1).with_deadline(due(2)),
        Task::new(3, "Market research on competitors", 2)
            .with_deadline(due(14))
            .depends_on(1),
        Task::new(4, "Code review: optimize for security", 2)
            .with_deadline(due(9))
            .depends_on(2),
    ]
}
