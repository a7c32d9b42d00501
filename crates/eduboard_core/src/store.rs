//! The store façade: the single surface through which collaborators read
//! and mutate state.

use crate::aggregate;
use crate::collection::{Collection, SharedBackend};
use crate::config::Config;
use crate::error::{IntegrityWarning, StoreError, StoreResult};
use crate::index::RefIndex;
use crate::model::{
    AccessType, Answer, Attempt, Category, CertificateConfig, Comment, Course, Enrollment,
    EnrollmentKind, Instructor, Lesson, Payment, Quiz, Referral, Reply, Review, Section, Short,
    Slider, SubscriptionPlan, User, WalletTransaction, WalletTxnKind,
};
use crate::seed::{self, Seed};
use crate::types::{RecordId, Timestamp};
use eduboard_storage::{MemoryBackend, StorageBackend};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// NotFound collection labels for records nested inside a parent entity.
const SECTIONS: &str = "sections";
const LESSONS: &str = "lessons";
const COMMENTS: &str = "comments";

/// Whether a mutation reached the in-memory collection.
///
/// A `Storage` error is reported *after* the mutation was applied, so
/// bookkeeping (indexes, fan-out edits) must still run for it.
fn applied<T>(result: &StoreResult<T>) -> bool {
    matches!(result, Ok(_) | Err(StoreError::Storage(_)))
}

macro_rules! crud_ops {
    ($field:ident, $ty:ty, $kind:literal,
     $list:ident, $add:ident, $update:ident, $remove:ident) => {
        #[doc = concat!("Lists all ", $kind, " records in insertion order.")]
        #[must_use]
        pub fn $list(&self) -> Vec<$ty> {
            self.$field.list()
        }

        #[doc = concat!("Adds a ", $kind, " record and returns the stored copy.")]
        pub fn $add(&self, record: $ty) -> StoreResult<$ty> {
            self.$field.add(record)
        }

        #[doc = concat!("Shallow-merges a JSON patch into the ", $kind, " with the given id.")]
        ///
        /// Fields absent from the patch are untouched; the `id` field is
        /// immutable.
        pub fn $update(&self, id: RecordId, patch: serde_json::Value) -> StoreResult<$ty> {
            self.$field.update(id, patch)
        }

        #[doc = concat!("Removes the ", $kind, " with the given id. No cascade.")]
        pub fn $remove(&self, id: RecordId) -> StoreResult<()> {
            self.$field.remove_required(id)
        }
    };
}

macro_rules! toggle_op {
    ($field:ident, $ty:ty, $kind:literal, $name:ident) => {
        #[doc = concat!("Toggles `Active ⇄ Disabled` on the ", $kind, " with the given id.")]
        pub fn $name(&self, id: RecordId) -> StoreResult<$ty> {
            self.$field.toggle_status(id)
        }
    };
}

macro_rules! enrollment_view_ops {
    ($field:ident, $kind:literal, $list:ident, $update:ident, $remove:ident) => {
        #[doc = concat!("Lists all ", $kind, " enrollments in insertion order.")]
        #[must_use]
        pub fn $list(&self) -> Vec<Enrollment> {
            self.$field.list()
        }

        #[doc = concat!("Shallow-merges a JSON patch into a ", $kind, " enrollment.")]
        pub fn $update(&self, id: RecordId, patch: serde_json::Value) -> StoreResult<Enrollment> {
            self.$field.update(id, patch)
        }

        #[doc = concat!("Removes a ", $kind, " enrollment.")]
        pub fn $remove(&self, id: RecordId) -> StoreResult<()> {
            self.$field.remove_required(id)
        }
    };
}

/// The back-office data store.
///
/// `Store` owns every entity collection and is the sole mutation path:
/// collections are private, reads hand out snapshots, and every write goes
/// through a named operation that persists the changed collection.
///
/// # Opening a Store
///
/// ```rust
/// use eduboard_core::{Config, Store};
/// use eduboard_storage::MemoryBackend;
///
/// let store = Store::open(Box::new(MemoryBackend::new()), Config::default());
/// assert!(!store.list_courses().is_empty()); // demo seed
/// ```
///
/// For persistent data, open with an `eduboard_storage::DirBackend`.
pub struct Store {
    config: Config,
    categories: Collection<Category>,
    courses: Collection<Course>,
    instructors: Collection<Instructor>,
    users: Collection<User>,
    quizzes: Collection<Quiz>,
    shorts: Collection<Short>,
    sliders: Collection<Slider>,
    reviews: Collection<Review>,
    plans: Collection<SubscriptionPlan>,
    referrals: Collection<Referral>,
    course_enrollments: Collection<Enrollment>,
    ebook_enrollments: Collection<Enrollment>,
    job_enrollments: Collection<Enrollment>,
    subscription_enrollments: Collection<Enrollment>,
    /// course id -> enrollment ids, maintained on enroll/remove.
    enrollments_by_course: RwLock<RefIndex>,
    /// instructor id -> course ids, maintained on course add/remove.
    courses_by_instructor: RwLock<RefIndex>,
}

impl Store {
    /// Opens a store over the given backend.
    ///
    /// Each collection is loaded from its storage key. Absent keys fall
    /// back to demo seed data (when `config.seed_on_empty` is set);
    /// corrupt documents fall back the same way with a warning, so a
    /// damaged file never makes the store unusable.
    pub fn open(backend: Box<dyn StorageBackend>, config: Config) -> Self {
        let backend: SharedBackend = Arc::new(RwLock::new(backend));
        let seed = if config.seed_on_empty {
            seed::demo_data()
        } else {
            Seed::default()
        };

        let courses = Collection::load("courses", Arc::clone(&backend), seed.courses);
        let course_enrollments: Collection<Enrollment> = Collection::load(
            EnrollmentKind::Course.collection_key(),
            Arc::clone(&backend),
            Vec::new(),
        );

        let enrollments_by_course = RefIndex::build(
            course_enrollments
                .list()
                .into_iter()
                .filter_map(|e| e.item_id.map(|course_id| (course_id, e.id))),
        );
        let courses_by_instructor = RefIndex::build(
            courses.list().into_iter().map(|c| (c.instructor_id, c.id)),
        );

        Self {
            categories: Collection::load("categories", Arc::clone(&backend), seed.categories),
            instructors: Collection::load("instructors", Arc::clone(&backend), seed.instructors),
            users: Collection::load("users", Arc::clone(&backend), seed.users),
            quizzes: Collection::load("quizzes", Arc::clone(&backend), seed.quizzes),
            shorts: Collection::load("shorts", Arc::clone(&backend), seed.shorts),
            sliders: Collection::load("sliders", Arc::clone(&backend), Vec::new()),
            reviews: Collection::load("reviews", Arc::clone(&backend), seed.reviews),
            plans: Collection::load("subscription_plans", Arc::clone(&backend), seed.plans),
            referrals: Collection::load("referrals", Arc::clone(&backend), Vec::new()),
            ebook_enrollments: Collection::load(
                EnrollmentKind::Ebook.collection_key(),
                Arc::clone(&backend),
                Vec::new(),
            ),
            job_enrollments: Collection::load(
                EnrollmentKind::Job.collection_key(),
                Arc::clone(&backend),
                Vec::new(),
            ),
            subscription_enrollments: Collection::load(
                EnrollmentKind::Subscription.collection_key(),
                Arc::clone(&backend),
                Vec::new(),
            ),
            courses,
            course_enrollments,
            enrollments_by_course: RwLock::new(enrollments_by_course),
            courses_by_instructor: RwLock::new(courses_by_instructor),
            config,
        }
    }

    /// Opens a fresh unseeded in-memory store for testing.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::open(
            Box::new(MemoryBackend::new()),
            Config::default().seed_on_empty(false),
        )
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // Uniform CRUD surface
    // ========================================================================

    crud_ops!(categories, Category, "category",
        list_categories, add_category, update_category, remove_category);
    toggle_op!(categories, Category, "category", toggle_category_status);

    crud_ops!(users, User, "user", list_users, add_user, update_user, remove_user);
    toggle_op!(users, User, "user", toggle_user_status);

    crud_ops!(quizzes, Quiz, "quiz", list_quizzes, add_quiz, update_quiz, remove_quiz);
    toggle_op!(quizzes, Quiz, "quiz", toggle_quiz_status);

    crud_ops!(shorts, Short, "short", list_shorts, add_short, update_short, remove_short);
    toggle_op!(shorts, Short, "short", toggle_short_status);

    crud_ops!(sliders, Slider, "slider", list_sliders, add_slider, update_slider, remove_slider);
    toggle_op!(sliders, Slider, "slider", toggle_slider_status);

    crud_ops!(reviews, Review, "review", list_reviews, add_review, update_review, remove_review);
    toggle_op!(reviews, Review, "review", toggle_review_status);

    crud_ops!(plans, SubscriptionPlan, "subscription plan",
        list_plans, add_plan, update_plan, remove_plan);
    toggle_op!(plans, SubscriptionPlan, "subscription plan", toggle_plan_status);

    crud_ops!(referrals, Referral, "referral",
        list_referrals, add_referral, update_referral, remove_referral);

    enrollment_view_ops!(ebook_enrollments, "ebook",
        list_ebook_enrollments, update_ebook_enrollment, remove_ebook_enrollment);
    enrollment_view_ops!(job_enrollments, "job",
        list_job_enrollments, update_job_enrollment, remove_job_enrollment);
    enrollment_view_ops!(subscription_enrollments, "subscription",
        list_subscription_enrollments, update_subscription_enrollment,
        remove_subscription_enrollment);

    // ========================================================================
    // Instructors (index-aware removal)
    // ========================================================================

    /// Lists all instructor records in insertion order.
    #[must_use]
    pub fn list_instructors(&self) -> Vec<Instructor> {
        self.instructors.list()
    }

    /// Adds an instructor and returns the stored copy.
    pub fn add_instructor(&self, instructor: Instructor) -> StoreResult<Instructor> {
        self.instructors.add(instructor)
    }

    /// Shallow-merges a JSON patch into an instructor record.
    pub fn update_instructor(
        &self,
        id: RecordId,
        patch: serde_json::Value,
    ) -> StoreResult<Instructor> {
        self.instructors.update(id, patch)
    }

    /// Removes an instructor. Their courses are retained (no cascade) and
    /// show up in [`Store::integrity_report`] as orphans.
    pub fn remove_instructor(&self, id: RecordId) -> StoreResult<()> {
        let result = self.instructors.remove_required(id);
        if applied(&result) {
            let orphans = self.courses_by_instructor.write().remove_parent(id);
            if !orphans.is_empty() {
                warn!(instructor = %id, courses = orphans.len(),
                    "instructor removed, courses retained without owner");
            }
        }
        result
    }

    toggle_op!(instructors, Instructor, "instructor", toggle_instructor_status);

    // ========================================================================
    // Courses & curriculum
    // ========================================================================

    /// Lists all course records in insertion order.
    #[must_use]
    pub fn list_courses(&self) -> Vec<Course> {
        self.courses.list()
    }

    /// Returns the course with the given id.
    pub fn get_course(&self, id: RecordId) -> StoreResult<Course> {
        self.courses.get_required(id)
    }

    /// Adds a course.
    ///
    /// The instructor must exist; its current display name is copied onto
    /// the course, and the instructor index is updated.
    pub fn add_course(&self, mut course: Course) -> StoreResult<Course> {
        let instructor = self.instructors.get_required(course.instructor_id)?;
        course.instructor = instructor.name;

        let course_id = course.id;
        let instructor_id = course.instructor_id;
        let result = self.courses.add(course);
        if applied(&result) {
            self.courses_by_instructor
                .write()
                .insert(instructor_id, course_id);
        }
        result
    }

    /// Shallow-merges a JSON patch into a course record.
    ///
    /// A patch that changes `instructor_id` moves the course under its new
    /// instructor in the index.
    pub fn update_course(&self, id: RecordId, patch: serde_json::Value) -> StoreResult<Course> {
        let before = self.courses.get_required(id)?;
        let result = self.courses.update(id, patch);
        if applied(&result) {
            // On a storage error the merged record is still in memory
            if let Some(after) = self.courses.get(id) {
                if after.instructor_id != before.instructor_id {
                    let mut index = self.courses_by_instructor.write();
                    index.remove_child(before.instructor_id, id);
                    index.insert(after.instructor_id, id);
                }
            }
        }
        result
    }

    /// Removes a course.
    ///
    /// Enrollments referencing the course are retained (no cascade); their
    /// index entry is dropped and they appear in
    /// [`Store::integrity_report`] as orphans.
    pub fn remove_course(&self, id: RecordId) -> StoreResult<()> {
        let course = self.courses.get_required(id)?;
        let result = self.courses.remove_required(id);
        if applied(&result) {
            self.courses_by_instructor
                .write()
                .remove_child(course.instructor_id, id);
            let orphans = self.enrollments_by_course.write().remove_parent(id);
            if !orphans.is_empty() {
                warn!(course = %id, enrollments = orphans.len(),
                    "course removed, enrollments retained as orphans");
            }
        }
        result
    }

    toggle_op!(courses, Course, "course", toggle_course_status);

    /// Appends an empty section to a course's curriculum.
    pub fn add_section(&self, course_id: RecordId, title: impl Into<String>) -> StoreResult<Course> {
        let section = Section::new(title);
        if section.title.trim().is_empty() {
            return Err(StoreError::validation("section title must not be empty"));
        }
        self.courses
            .modify(course_id, |course| course.curriculum.push(section))
    }

    /// Appends a lesson to a section of a course.
    pub fn add_lesson(
        &self,
        course_id: RecordId,
        section_id: RecordId,
        lesson: Lesson,
    ) -> StoreResult<Course> {
        let course = self.courses.get_required(course_id)?;
        if course.section(section_id).is_none() {
            return Err(StoreError::not_found(SECTIONS, section_id));
        }
        self.courses.modify(course_id, |course| {
            if let Some(section) = course.curriculum.iter_mut().find(|s| s.id == section_id) {
                section.lessons.push(lesson);
            }
        })
    }

    /// Removes a lesson from a section of a course.
    pub fn remove_lesson(
        &self,
        course_id: RecordId,
        section_id: RecordId,
        lesson_id: RecordId,
    ) -> StoreResult<Course> {
        let course = self.courses.get_required(course_id)?;
        let section = course
            .section(section_id)
            .ok_or_else(|| StoreError::not_found(SECTIONS, section_id))?;
        if !section.lessons.iter().any(|l| l.id == lesson_id) {
            return Err(StoreError::not_found(LESSONS, lesson_id));
        }
        self.courses.modify(course_id, |course| {
            if let Some(section) = course.curriculum.iter_mut().find(|s| s.id == section_id) {
                section.lessons.retain(|l| l.id != lesson_id);
            }
        })
    }

    /// Moves a lesson from one section of a course to another.
    ///
    /// The move is a remove-then-insert: the lesson ends up exactly once,
    /// appended to the target section.
    pub fn move_lesson(
        &self,
        course_id: RecordId,
        lesson_id: RecordId,
        from_section_id: RecordId,
        to_section_id: RecordId,
    ) -> StoreResult<Course> {
        let course = self.courses.get_required(course_id)?;
        let from = course
            .section(from_section_id)
            .ok_or_else(|| StoreError::not_found(SECTIONS, from_section_id))?;
        if course.section(to_section_id).is_none() {
            return Err(StoreError::not_found(SECTIONS, to_section_id));
        }
        if !from.lessons.iter().any(|l| l.id == lesson_id) {
            return Err(StoreError::not_found(LESSONS, lesson_id));
        }

        self.courses.modify(course_id, |course| {
            let mut moved = None;
            if let Some(from) = course
                .curriculum
                .iter_mut()
                .find(|s| s.id == from_section_id)
            {
                if let Some(pos) = from.lessons.iter().position(|l| l.id == lesson_id) {
                    moved = Some(from.lessons.remove(pos));
                }
            }
            if let (Some(lesson), Some(to)) = (
                moved,
                course.curriculum.iter_mut().find(|s| s.id == to_section_id),
            ) {
                to.lessons.push(lesson);
            }
        })
    }

    // ========================================================================
    // Enrollments
    // ========================================================================

    fn enrollments(&self, kind: EnrollmentKind) -> &Collection<Enrollment> {
        match kind {
            EnrollmentKind::Course => &self.course_enrollments,
            EnrollmentKind::Ebook => &self.ebook_enrollments,
            EnrollmentKind::Job => &self.job_enrollments,
            EnrollmentKind::Subscription => &self.subscription_enrollments,
        }
    }

    /// Lists all course enrollments in insertion order.
    #[must_use]
    pub fn list_course_enrollments(&self) -> Vec<Enrollment> {
        self.course_enrollments.list()
    }

    /// Enrolls a user in a course.
    ///
    /// Display names are copied from the user and course at enrollment
    /// time; the join itself is by id through the enrollment index. The
    /// course title is also appended to the user's purchase history.
    pub fn enroll_course(
        &self,
        user_id: RecordId,
        course_id: RecordId,
        access: AccessType,
        payment: Payment,
    ) -> StoreResult<Enrollment> {
        let user = self.users.get_required(user_id)?;
        let course = self.courses.get_required(course_id)?;

        let enrollment = Enrollment::new(
            EnrollmentKind::Course,
            user_id,
            user.name,
            Some(course_id),
            course.title.clone(),
            access,
            payment,
        );
        let enrollment_id = enrollment.id;

        let result = self.course_enrollments.add(enrollment);
        if applied(&result) {
            self.enrollments_by_course
                .write()
                .insert(course_id, enrollment_id);
            self.users
                .modify(user_id, |u| u.purchases.push(course.title.clone()))?;
        }
        result
    }

    /// Shallow-merges a JSON patch into a course enrollment, keeping the
    /// enrollment index in step with any `item_id` change.
    pub fn update_course_enrollment(
        &self,
        id: RecordId,
        patch: serde_json::Value,
    ) -> StoreResult<Enrollment> {
        let before = self.course_enrollments.get_required(id)?;
        let result = self.course_enrollments.update(id, patch);
        if applied(&result) {
            if let Some(after) = self.course_enrollments.get(id) {
                if after.item_id != before.item_id {
                    let mut index = self.enrollments_by_course.write();
                    if let Some(old) = before.item_id {
                        index.remove_child(old, id);
                    }
                    if let Some(new) = after.item_id {
                        index.insert(new, id);
                    }
                }
            }
        }
        result
    }

    /// Removes a course enrollment and its index entry.
    pub fn remove_course_enrollment(&self, id: RecordId) -> StoreResult<()> {
        let enrollment = self.course_enrollments.get_required(id)?;
        let result = self.course_enrollments.remove_required(id);
        if applied(&result) {
            if let Some(course_id) = enrollment.item_id {
                self.enrollments_by_course
                    .write()
                    .remove_child(course_id, id);
            }
        }
        result
    }

    /// Records an ebook purchase for a user.
    ///
    /// Ebooks live outside the store, so the enrollment carries only the
    /// display name, with no foreign key.
    pub fn enroll_ebook(
        &self,
        user_id: RecordId,
        item_name: impl Into<String>,
        access: AccessType,
        payment: Payment,
    ) -> StoreResult<Enrollment> {
        self.enroll_external(EnrollmentKind::Ebook, user_id, item_name.into(), access, payment)
    }

    /// Records job-board access for a user.
    pub fn enroll_job(
        &self,
        user_id: RecordId,
        item_name: impl Into<String>,
        access: AccessType,
        payment: Payment,
    ) -> StoreResult<Enrollment> {
        self.enroll_external(EnrollmentKind::Job, user_id, item_name.into(), access, payment)
    }

    fn enroll_external(
        &self,
        kind: EnrollmentKind,
        user_id: RecordId,
        item_name: String,
        access: AccessType,
        payment: Payment,
    ) -> StoreResult<Enrollment> {
        let user = self.users.get_required(user_id)?;
        let enrollment = Enrollment::new(kind, user_id, user.name, None, item_name, access, payment);
        self.enrollments(kind).add(enrollment)
    }

    /// Enrolls a user in a subscription plan.
    pub fn subscribe(
        &self,
        user_id: RecordId,
        plan_id: RecordId,
        payment: Payment,
    ) -> StoreResult<Enrollment> {
        let user = self.users.get_required(user_id)?;
        let plan = self.plans.get_required(plan_id)?;
        let enrollment = Enrollment::new(
            EnrollmentKind::Subscription,
            user_id,
            user.name,
            Some(plan_id),
            plan.plan_type,
            AccessType::Paid,
            payment,
        );
        self.subscription_enrollments.add(enrollment)
    }

    /// Stores a certificate layout on the enrollment that triggered it and
    /// flags the certificate as generated.
    ///
    /// The config is opaque to the store; re-issuing a certificate edits
    /// this enrollment's config only.
    pub fn set_certificate_config(
        &self,
        kind: EnrollmentKind,
        enrollment_id: RecordId,
        config: CertificateConfig,
    ) -> StoreResult<Enrollment> {
        self.enrollments(kind).modify(enrollment_id, |e| {
            e.certificate_config = Some(config);
            e.is_certificate_generated = true;
        })
    }

    /// Whether an enrollment is eligible for a certificate.
    pub fn certificate_eligible(
        &self,
        kind: EnrollmentKind,
        enrollment_id: RecordId,
    ) -> StoreResult<bool> {
        let enrollment = self.enrollments(kind).get_required(enrollment_id)?;
        Ok(aggregate::certificate_eligible(&enrollment))
    }

    // ========================================================================
    // Referential reads (resolver)
    // ========================================================================

    /// Returns the enrollments for a course, resolved through the
    /// enrollment index (no collection scan).
    #[must_use]
    pub fn enrollments_for_course(&self, course_id: RecordId) -> Vec<Enrollment> {
        self.enrollments_by_course
            .read()
            .children_of(course_id)
            .into_iter()
            .filter_map(|id| self.course_enrollments.get(id))
            .collect()
    }

    /// Returns the courses taught by an instructor.
    #[must_use]
    pub fn courses_of_instructor(&self, instructor_id: RecordId) -> Vec<Course> {
        self.courses_by_instructor
            .read()
            .children_of(instructor_id)
            .into_iter()
            .filter_map(|id| self.courses.get(id))
            .collect()
    }

    /// Returns a student's attempts on a quiz, in submission order.
    pub fn attempts_of_student(
        &self,
        quiz_id: RecordId,
        student_id: RecordId,
    ) -> StoreResult<Vec<Attempt>> {
        let quiz = self.quizzes.get_required(quiz_id)?;
        Ok(quiz
            .attempts
            .into_iter()
            .filter(|a| a.student_id == student_id)
            .collect())
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Number of students enrolled in a course. Zero for a course with no
    /// enrollments.
    pub fn course_student_count(&self, course_id: RecordId) -> StoreResult<usize> {
        self.courses.get_required(course_id)?;
        Ok(aggregate::student_count(
            &self.enrollments_for_course(course_id),
        ))
    }

    /// Revenue of a course in cents. Zero for a course with no
    /// enrollments.
    pub fn course_revenue(&self, course_id: RecordId) -> StoreResult<i64> {
        self.courses.get_required(course_id)?;
        Ok(aggregate::revenue(&self.enrollments_for_course(course_id)))
    }

    /// Total revenue across all of an instructor's courses, in cents.
    pub fn instructor_revenue(&self, instructor_id: RecordId) -> StoreResult<i64> {
        self.instructors.get_required(instructor_id)?;
        Ok(self
            .courses_of_instructor(instructor_id)
            .iter()
            .map(|course| aggregate::revenue(&self.enrollments_for_course(course.id)))
            .sum())
    }

    // ========================================================================
    // Quizzes
    // ========================================================================

    /// Grades and records a quiz attempt, returning the stored attempt.
    ///
    /// The pass threshold is the quiz's own, falling back to the store
    /// default from [`Config`].
    pub fn record_attempt(
        &self,
        quiz_id: RecordId,
        student_id: RecordId,
        answers: Vec<Answer>,
    ) -> StoreResult<Attempt> {
        let user = self.users.get_required(student_id)?;
        let quiz = self.quizzes.get_required(quiz_id)?;

        let threshold = quiz
            .pass_threshold_pct
            .unwrap_or(self.config.pass_threshold_pct);
        let outcome = aggregate::grade_attempt(&quiz.questions, &answers, threshold);

        let attempt = Attempt {
            id: RecordId::new(),
            student_id,
            student_name: user.name,
            date: Timestamp::now(),
            marks: outcome.marks,
            total_marks: outcome.total_marks,
            percentage: outcome.percentage,
            status: outcome.status,
            answers,
        };

        let stored = attempt.clone();
        self.quizzes
            .modify(quiz_id, move |quiz| quiz.attempts.push(attempt))?;
        Ok(stored)
    }

    // ========================================================================
    // Engagement
    // ========================================================================

    /// Posts a comment on a short, returning the stored comment.
    pub fn add_comment(
        &self,
        short_id: RecordId,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> StoreResult<Comment> {
        let comment = Comment::new(user, text);
        if comment.text.trim().is_empty() {
            return Err(StoreError::validation("comment text must not be empty"));
        }
        let stored = comment.clone();
        self.shorts
            .modify(short_id, move |short| short.comments.push(comment))?;
        Ok(stored)
    }

    /// Posts a reply under a comment on a short.
    pub fn add_reply(
        &self,
        short_id: RecordId,
        comment_id: RecordId,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> StoreResult<Short> {
        let short = self.shorts.get_required(short_id)?;
        if !short.comments.iter().any(|c| c.id == comment_id) {
            return Err(StoreError::not_found(COMMENTS, comment_id));
        }

        let reply = Reply {
            user: user.into(),
            text: text.into(),
            at: Timestamp::now(),
        };
        if reply.text.trim().is_empty() {
            return Err(StoreError::validation("reply text must not be empty"));
        }

        self.shorts.modify(short_id, move |short| {
            if let Some(comment) = short.comments.iter_mut().find(|c| c.id == comment_id) {
                comment.replies.push(reply);
            }
        })
    }

    /// Increments a short's like counter.
    pub fn like_short(&self, short_id: RecordId) -> StoreResult<Short> {
        self.shorts.modify(short_id, |short| short.likes += 1)
    }

    /// Increments a short's share counter.
    pub fn share_short(&self, short_id: RecordId) -> StoreResult<Short> {
        self.shorts.modify(short_id, |short| short.shares += 1)
    }

    // ========================================================================
    // Wallets
    // ========================================================================

    /// Credits a user's wallet, appending to the transaction log.
    pub fn credit_wallet(
        &self,
        user_id: RecordId,
        amount: i64,
        note: impl Into<String>,
    ) -> StoreResult<User> {
        if amount <= 0 {
            return Err(StoreError::validation("credit amount must be positive"));
        }
        let note = note.into();
        self.users.modify(user_id, move |user| {
            user.wallet.transactions.push(WalletTransaction {
                id: RecordId::new(),
                kind: WalletTxnKind::Credit,
                amount,
                note,
                at: Timestamp::now(),
            });
            user.wallet.earnings += amount;
            user.wallet.balance = user.wallet.computed_balance();
        })
    }

    /// Withdraws from a user's wallet.
    ///
    /// The authoritative `earnings - withdrawn` balance is checked, not
    /// the stored field; overdrawing is a validation error.
    pub fn withdraw_from_wallet(
        &self,
        user_id: RecordId,
        amount: i64,
        note: impl Into<String>,
    ) -> StoreResult<User> {
        if amount <= 0 {
            return Err(StoreError::validation("withdrawal amount must be positive"));
        }
        let user = self.users.get_required(user_id)?;
        if user.wallet.computed_balance() < amount {
            return Err(StoreError::validation(format!(
                "withdrawal of {amount} exceeds balance {}",
                user.wallet.computed_balance()
            )));
        }

        let note = note.into();
        self.users.modify(user_id, move |user| {
            user.wallet.transactions.push(WalletTransaction {
                id: RecordId::new(),
                kind: WalletTxnKind::Withdrawal,
                amount,
                note,
                at: Timestamp::now(),
            });
            user.wallet.withdrawn += amount;
            user.wallet.balance = user.wallet.computed_balance();
        })
    }

    /// Returns a user's authoritative wallet balance.
    ///
    /// The stored balance field is reconciled against
    /// `earnings - withdrawn`; drift is returned (and logged) as a
    /// warning, never an error.
    pub fn wallet_balance(
        &self,
        user_id: RecordId,
    ) -> StoreResult<(i64, Option<IntegrityWarning>)> {
        let user = self.users.get_required(user_id)?;
        let reconciliation = aggregate::reconcile_wallet(&user.wallet);

        let warning = if reconciliation.drifted() {
            let warning = IntegrityWarning::WalletDrift {
                user_id,
                stored: reconciliation.stored,
                computed: reconciliation.computed,
            };
            warn!(%warning, "wallet balance drift");
            Some(warning)
        } else {
            None
        };

        Ok((reconciliation.computed, warning))
    }

    // ========================================================================
    // Referrals
    // ========================================================================

    /// Registers a referral sign-up and credits the owner of the code
    /// with one more referral.
    pub fn register_referral(&self, referral: Referral) -> StoreResult<Referral> {
        let stored = self.referrals.add(referral)?;

        let owner = self
            .users
            .list()
            .into_iter()
            .find(|u| u.referral.my_referral_code == stored.referral_code);
        if let Some(owner) = owner {
            self.users
                .modify(owner.id, |u| u.referral.referral_count += 1)?;
        }
        Ok(stored)
    }

    /// Marks a user as referred by the given code and credits the code's
    /// owner.
    pub fn apply_referral_code(
        &self,
        user_id: RecordId,
        code: impl Into<String>,
    ) -> StoreResult<User> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(StoreError::validation("referral code must not be empty"));
        }

        let user = self.users.get_required(user_id)?;
        if user.referral.is_referred {
            return Err(StoreError::validation("user is already referred"));
        }
        if user.referral.my_referral_code == code {
            return Err(StoreError::validation("cannot apply own referral code"));
        }

        let owner = self
            .users
            .list()
            .into_iter()
            .find(|u| u.referral.my_referral_code == code)
            .ok_or_else(|| StoreError::validation(format!("unknown referral code: {code}")))?;
        self.users
            .modify(owner.id, |u| u.referral.referral_count += 1)?;

        let code_for_user = code;
        self.users.modify(user_id, move |u| {
            u.referral.is_referred = true;
            u.referral.referred_by_code = Some(code_for_user);
        })
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Scans the store for non-fatal integrity findings: wallet drift,
    /// enrollments whose course is gone, courses whose instructor is gone.
    ///
    /// Findings are logged and returned; nothing is repaired or removed.
    #[must_use]
    pub fn integrity_report(&self) -> Vec<IntegrityWarning> {
        let mut warnings = Vec::new();

        for user in self.users.list() {
            let reconciliation = aggregate::reconcile_wallet(&user.wallet);
            if reconciliation.drifted() {
                warnings.push(IntegrityWarning::WalletDrift {
                    user_id: user.id,
                    stored: reconciliation.stored,
                    computed: reconciliation.computed,
                });
            }
        }

        for enrollment in self.course_enrollments.list() {
            let orphaned = match enrollment.item_id {
                Some(course_id) => self.courses.get(course_id).is_none(),
                None => true,
            };
            if orphaned {
                warnings.push(IntegrityWarning::OrphanedEnrollment {
                    enrollment_id: enrollment.id,
                    item_name: enrollment.item_name,
                });
            }
        }

        for course in self.courses.list() {
            if self.instructors.get(course.instructor_id).is_none() {
                warnings.push(IntegrityWarning::OrphanedCourse {
                    course_id: course.id,
                    instructor: course.instructor,
                });
            }
        }

        for warning in &warnings {
            warn!(%warning, "integrity finding");
        }
        warnings
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("categories", &self.categories.len())
            .field("courses", &self.courses.len())
            .field("users", &self.users.len())
            .field("course_enrollments", &self.course_enrollments.len())
            .finish_non_exhaustive()
    }
}
