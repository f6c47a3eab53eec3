//! Coaching suggestions.
//!
//! A suggestion is derived from the task list: with no tasks the user is told
//! to add some, otherwise one of five templates is drawn for the
//! highest-priority task. The draw goes through [`TemplatePicker`] so callers
//! can make it deterministic.
//!
//! [`Coach`] keeps the suggestion on display. A distraction warning replaces
//! it until the next refresh.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::{Event, EventListener};
use crate::locks::{read_lock, write_lock};
use crate::tasks::{top_priority, Task, TaskStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "subject", rename_all = "snake_case")]
pub enum Suggestion {
    AddTasks,
    FocusFirst(String),
    BreakIntoSteps(String),
    TakeBreak,
    StayConsistent,
    TryWithin25Minutes(String),
    Distracted(String),
}

/// Templates drawn for a non-empty task list, in draw order.
pub const TEMPLATE_COUNT: usize = 5;

impl Suggestion {
    fn from_template(index: usize, title: &str) -> Self {
        match index % TEMPLATE_COUNT {
            0 => Suggestion::FocusFirst(title.to_string()),
            1 => Suggestion::BreakIntoSteps(title.to_string()),
            2 => Suggestion::TakeBreak,
            3 => Suggestion::StayConsistent,
            _ => Suggestion::TryWithin25Minutes(title.to_string()),
        }
    }

    /// Title of the task the suggestion talks about, if any.
    pub fn task_title(&self) -> Option<&str> {
        match self {
            Suggestion::FocusFirst(t)
            | Suggestion::BreakIntoSteps(t)
            | Suggestion::TryWithin25Minutes(t) => Some(t),
            _ => None,
        }
    }

    /// True for the five task-list templates.
    pub fn is_template(&self) -> bool {
        !matches!(self, Suggestion::AddTasks | Suggestion::Distracted(_))
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::AddTasks => write!(f, "Add a few tasks to get started!"),
            Suggestion::FocusFirst(t) => {
                write!(f, "Focus on '{t}' first, it's your most important task!")
            }
            Suggestion::BreakIntoSteps(t) => {
                write!(f, "Break '{t}' into smaller steps to reduce pressure.")
            }
            Suggestion::TakeBreak => write!(f, "Take a 5-minute break, then jump back into focus."),
            Suggestion::StayConsistent => write!(f, "Stay consistent and reward your progress!"),
            Suggestion::TryWithin25Minutes(t) => {
                write!(f, "Try completing '{t}' in the next 25 minutes!")
            }
            Suggestion::Distracted(dest) => write!(f, "Distracted on {dest}! Get back to work."),
        }
    }
}

/// Chooses which of `count` templates to show.
pub trait TemplatePicker: Send + Sync {
    /// Must return a value in `0..count`; `count` is never zero.
    fn pick(&self, count: usize) -> usize;
}

/// Uniform random draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl TemplatePicker for RandomPicker {
    fn pick(&self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Walks the templates in order, wrapping around.
#[derive(Debug, Default)]
pub struct CyclingPicker {
    next: AtomicUsize,
}

impl CyclingPicker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplatePicker for CyclingPicker {
    fn pick(&self, count: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % count
    }
}

/// Always picks the same template.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl TemplatePicker for FixedPicker {
    fn pick(&self, count: usize) -> usize {
        self.0 % count
    }
}

/// Suggestion for the given task list.
pub fn suggest(tasks: &[Task], picker: &dyn TemplatePicker) -> Suggestion {
    match top_priority(tasks) {
        None => Suggestion::AddTasks,
        Some(task) => Suggestion::from_template(picker.pick(TEMPLATE_COUNT), &task.title),
    }
}

/// Holds the suggestion currently on display.
pub struct Coach {
    picker: Arc<dyn TemplatePicker>,
    current: Suggestion,
    distraction: Option<Suggestion>,
}

impl Coach {
    pub fn new(picker: Arc<dyn TemplatePicker>) -> Self {
        Self {
            picker,
            current: Suggestion::AddTasks,
            distraction: None,
        }
    }

    /// Draw a new suggestion and drop any distraction warning.
    pub fn refresh(&mut self, tasks: &[Task]) -> &Suggestion {
        self.current = suggest(tasks, self.picker.as_ref());
        self.distraction = None;
        &self.current
    }

    pub fn flag_distraction(&mut self, destination: &str) {
        self.distraction = Some(Suggestion::Distracted(destination.to_string()));
    }

    /// The warning if one is pending, otherwise the last drawn suggestion.
    pub fn current(&self) -> &Suggestion {
        self.distraction.as_ref().unwrap_or(&self.current)
    }
}

/// Feeds bus events into a shared coach.
pub struct CoachListener {
    coach: Arc<RwLock<Coach>>,
    tasks: Arc<RwLock<TaskStore>>,
}

impl CoachListener {
    pub fn new(coach: Arc<RwLock<Coach>>, tasks: Arc<RwLock<TaskStore>>) -> Self {
        Self { coach, tasks }
    }
}

impl EventListener for CoachListener {
    fn on_event(&self, event: &Event) {
        match event {
            Event::SuggestionRefreshDue { .. } => {
                let tasks = read_lock(&self.tasks).list().to_vec();
                write_lock(&self.coach).refresh(&tasks);
            }
            Event::DistractionDetected { destination, .. } => {
                write_lock(&self.coach).flag_distraction(destination);
            }
            _ => {}
        }
    }
}
