//! Catalog browsing as an explicit stack of views.
//!
//! The root frame always lists subjects. Drilling into a subject pushes a
//! courses frame, drilling into a course pushes a details frame. Each frame
//! owns its own loading flag, error and data, so popping a frame throws all
//! of that away and re-entering the same level fetches again.
//!
//! Forward moves are split in two: `open_*` validates and pushes a loading
//! frame, `complete_*` stores the fetch outcome. The async helpers
//! ([`CatalogNavigator::load_subjects`], [`CatalogNavigator::enter_subject`],
//! [`CatalogNavigator::enter_course`]) run both around a single
//! [`CatalogSource`] call.

use crate::catalog::{CourseDetails, CourseSummary, Subject};
use crate::error::{CatalogError, NavigationError, TutorError};
use crate::traits::CatalogSource;
use crate::tutor::Tutor;

/// Subject list at the root of the stack.
#[derive(Debug, Clone, Default)]
pub struct SubjectsFrame {
    pub subjects: Vec<Subject>,
    pub loading: bool,
    pub error: Option<String>,
    filter: String,
}

impl SubjectsFrame {
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

/// Courses offered by one subject.
#[derive(Debug, Clone)]
pub struct CoursesFrame {
    pub subject: Subject,
    pub courses: Vec<CourseSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

/// One AI assist answer attached to a details frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistSlot {
    pub loading: bool,
    pub text: Option<String>,
    pub error: Option<String>,
}

/// Which assist slot a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistKind {
    Explanation,
    Prerequisites,
}

/// Full record for one course plus its assist answers.
#[derive(Debug, Clone)]
pub struct DetailsFrame {
    pub subject_id: String,
    pub course: CourseSummary,
    pub details: Option<CourseDetails>,
    pub loading: bool,
    pub error: Option<String>,
    pub explanation: AssistSlot,
    pub prerequisites: AssistSlot,
}

impl DetailsFrame {
    fn slot_mut(&mut self, kind: AssistKind) -> &mut AssistSlot {
        match kind {
            AssistKind::Explanation => &mut self.explanation,
            AssistKind::Prerequisites => &mut self.prerequisites,
        }
    }

    pub fn slot(&self, kind: AssistKind) -> &AssistSlot {
        match kind {
            AssistKind::Explanation => &self.explanation,
            AssistKind::Prerequisites => &self.prerequisites,
        }
    }
}

/// A level pushed above the subjects root.
#[derive(Debug, Clone)]
pub enum Frame {
    Courses(CoursesFrame),
    Details(DetailsFrame),
}

impl Frame {
    pub fn view_name(&self) -> &'static str {
        match self {
            Frame::Courses(_) => "courses",
            Frame::Details(_) => "details",
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            Frame::Courses(f) => f.loading,
            Frame::Details(f) => f.loading,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Frame::Courses(f) => f.error.as_deref(),
            Frame::Details(f) => f.error.as_deref(),
        }
    }
}

/// Subject → course → details browser state.
#[derive(Debug, Clone)]
pub struct CatalogNavigator {
    root: SubjectsFrame,
    stack: Vec<Frame>,
}

impl Default for CatalogNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogNavigator {
    pub fn new() -> Self {
        Self {
            root: SubjectsFrame::default(),
            stack: Vec::new(),
        }
    }

    /// Number of frames, counting the subjects root.
    pub fn depth(&self) -> usize {
        self.stack.len() + 1
    }

    pub fn subjects(&self) -> &SubjectsFrame {
        &self.root
    }

    /// The frame on top of the stack.
    pub fn current(&self) -> CurrentView<'_> {
        match self.stack.last() {
            None => CurrentView::Subjects(&self.root),
            Some(Frame::Courses(f)) => CurrentView::Courses(f),
            Some(Frame::Details(f)) => CurrentView::Details(f),
        }
    }

    fn top_view_name(&self) -> &'static str {
        self.stack.last().map_or("subjects", Frame::view_name)
    }

    fn top_is_loading(&self) -> bool {
        self.stack.last().map_or(self.root.loading, Frame::is_loading)
    }

    // -- subjects ----------------------------------------------------------

    /// Start (re)loading the subject list. Only valid on the root view.
    pub fn open_subjects(&mut self) -> Result<(), NavigationError> {
        if !self.stack.is_empty() {
            return Err(self.wrong_view("load subjects"));
        }
        if self.root.loading {
            return Err(NavigationError::Busy);
        }
        self.root.loading = true;
        self.root.error = None;
        Ok(())
    }

    /// Store the subject fetch outcome. A failure keeps whatever list was
    /// already shown. Returns `false` if no subject load was pending.
    pub fn complete_subjects(&mut self, result: Result<Vec<Subject>, CatalogError>) -> bool {
        if !self.root.loading {
            tracing::debug!("dropping subject result with no pending load");
            return false;
        }
        self.root.loading = false;
        match result {
            Ok(subjects) => {
                tracing::debug!(count = subjects.len(), "subjects loaded");
                self.root.subjects = subjects;
                self.root.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "subject fetch failed");
                self.root.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn set_filter(&mut self, query: &str) {
        self.root.filter = query.to_string();
    }

    /// Subjects matching the filter. Empty while the list is loading or
    /// showing an error.
    pub fn visible_subjects(&self) -> Vec<&Subject> {
        if self.root.loading || self.root.error.is_some() {
            return Vec::new();
        }
        self.root
            .subjects
            .iter()
            .filter(|s| s.matches(&self.root.filter))
            .collect()
    }

    // -- courses -----------------------------------------------------------

    /// Drill into a subject from the root view.
    pub fn open_subject(&mut self, subject_id: &str) -> Result<(), NavigationError> {
        if !self.stack.is_empty() {
            return Err(self.wrong_view("open a subject"));
        }
        if self.root.loading {
            return Err(NavigationError::Busy);
        }
        let subject = self
            .root
            .subjects
            .iter()
            .find(|s| s.id == subject_id)
            .cloned()
            .ok_or(NavigationError::UnknownEntry("subject"))?;
        self.stack.push(Frame::Courses(CoursesFrame {
            subject,
            courses: Vec::new(),
            loading: true,
            error: None,
        }));
        Ok(())
    }

    /// Store the course list fetch outcome on the pending courses frame.
    pub fn complete_courses(&mut self, result: Result<Vec<CourseSummary>, CatalogError>) -> bool {
        let Some(Frame::Courses(frame)) = self.stack.last_mut() else {
            tracing::debug!("dropping course list with no courses view open");
            return false;
        };
        if !frame.loading {
            return false;
        }
        frame.loading = false;
        match result {
            Ok(courses) => {
                tracing::debug!(subject = %frame.subject.id, count = courses.len(), "courses loaded");
                frame.courses = courses;
                frame.error = None;
            }
            Err(e) => {
                tracing::warn!(subject = %frame.subject.id, error = %e, "course fetch failed");
                frame.courses.clear();
                frame.error = Some(e.to_string());
            }
        }
        true
    }

    // -- details -----------------------------------------------------------

    /// Drill into a course from a loaded courses view.
    pub fn open_course(&mut self, course_id: &str) -> Result<(), NavigationError> {
        let view = self.top_view_name();
        let Some(Frame::Courses(frame)) = self.stack.last() else {
            return Err(NavigationError::WrongView {
                view,
                action: "open a course",
            });
        };
        if frame.loading {
            return Err(NavigationError::Busy);
        }
        let course = frame
            .courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or(NavigationError::UnknownEntry("course"))?;
        let subject_id = frame.subject.id.clone();
        self.stack.push(Frame::Details(DetailsFrame {
            subject_id,
            course,
            details: None,
            loading: true,
            error: None,
            explanation: AssistSlot::default(),
            prerequisites: AssistSlot::default(),
        }));
        Ok(())
    }

    /// Store the course details fetch outcome on the pending details frame.
    pub fn complete_details(&mut self, result: Result<CourseDetails, CatalogError>) -> bool {
        let Some(Frame::Details(frame)) = self.stack.last_mut() else {
            tracing::debug!("dropping course details with no details view open");
            return false;
        };
        if !frame.loading {
            return false;
        }
        frame.loading = false;
        match result {
            Ok(details) => {
                frame.details = Some(details);
                frame.error = None;
            }
            Err(e) => {
                tracing::warn!(course = %frame.course.id, error = %e, "details fetch failed");
                frame.details = None;
                frame.error = Some(e.to_string());
            }
        }
        true
    }

    /// Pop one level. Never fetches; returns `false` on the root view.
    pub fn back(&mut self) -> bool {
        match self.stack.pop() {
            Some(frame) => {
                tracing::debug!(view = frame.view_name(), "left view");
                true
            }
            None => false,
        }
    }

    // -- assist ------------------------------------------------------------

    /// Mark an assist request as in flight and hand back the details to send.
    pub fn open_assist(&mut self, kind: AssistKind) -> Result<CourseDetails, NavigationError> {
        let view = self.top_view_name();
        let Some(Frame::Details(frame)) = self.stack.last_mut() else {
            return Err(NavigationError::WrongView {
                view,
                action: "ask about a course",
            });
        };
        if frame.loading || frame.slot(kind).loading {
            return Err(NavigationError::Busy);
        }
        let details = frame.details.clone().ok_or(NavigationError::DetailsMissing)?;
        let slot = frame.slot_mut(kind);
        slot.loading = true;
        slot.error = None;
        Ok(details)
    }

    /// Store an assist outcome. The course details are left as they are.
    pub fn complete_assist(&mut self, kind: AssistKind, result: Result<String, TutorError>) -> bool {
        let Some(Frame::Details(frame)) = self.stack.last_mut() else {
            return false;
        };
        let slot = frame.slot_mut(kind);
        if !slot.loading {
            return false;
        }
        slot.loading = false;
        match result {
            Ok(text) => {
                slot.text = Some(text);
                slot.error = None;
            }
            Err(e) => {
                slot.error = Some(e.to_string());
            }
        }
        true
    }

    // -- async helpers -----------------------------------------------------

    pub async fn load_subjects(&mut self, source: &dyn CatalogSource) -> Result<(), NavigationError> {
        self.open_subjects()?;
        let result = source.fetch_subjects().await;
        self.complete_subjects(result);
        Ok(())
    }

    pub async fn enter_subject(
        &mut self,
        source: &dyn CatalogSource,
        subject_id: &str,
    ) -> Result<(), NavigationError> {
        self.open_subject(subject_id)?;
        let result = source.fetch_courses(subject_id).await;
        self.complete_courses(result);
        Ok(())
    }

    pub async fn enter_course(
        &mut self,
        source: &dyn CatalogSource,
        course_id: &str,
    ) -> Result<(), NavigationError> {
        self.open_course(course_id)?;
        let subject_id = match self.current() {
            CurrentView::Details(frame) => frame.subject_id.clone(),
            _ => return Err(NavigationError::DetailsMissing),
        };
        let result = source.fetch_course_details(&subject_id, course_id).await;
        self.complete_details(result);
        Ok(())
    }

    pub async fn explain(&mut self, tutor: &Tutor) -> Result<(), NavigationError> {
        let details = self.open_assist(AssistKind::Explanation)?;
        let result = tutor.explain_course(&details).await;
        self.complete_assist(AssistKind::Explanation, result);
        Ok(())
    }

    pub async fn suggest_prerequisites(&mut self, tutor: &Tutor) -> Result<(), NavigationError> {
        let details = self.open_assist(AssistKind::Prerequisites)?;
        let result = tutor.suggest_prerequisites(&details).await;
        self.complete_assist(AssistKind::Prerequisites, result);
        Ok(())
    }

    fn wrong_view(&self, action: &'static str) -> NavigationError {
        if self.top_is_loading() {
            return NavigationError::Busy;
        }
        NavigationError::WrongView {
            view: self.top_view_name(),
            action,
        }
    }
}

/// Borrowed view of the top frame.
#[derive(Debug, Clone, Copy)]
pub enum CurrentView<'a> {
    Subjects(&'a SubjectsFrame),
    Courses(&'a CoursesFrame),
    Details(&'a DetailsFrame),
}
