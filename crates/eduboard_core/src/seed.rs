//! First-run demo data.
//!
//! Used by [`crate::Store::open`] for any collection whose storage key is
//! absent (a valid state meaning "no prior data"), when
//! `Config::seed_on_empty` is set. Enrollment, referral, and slider
//! collections start empty — they only ever hold user-generated records.

use crate::model::{
    Category, Course, Instructor, PriceType, Question, Quiz, Review, Section, Short,
    SubscriptionPlan, User,
};

/// Demo records for a fresh store.
#[derive(Debug, Default)]
pub(crate) struct Seed {
    pub categories: Vec<Category>,
    pub instructors: Vec<Instructor>,
    pub courses: Vec<Course>,
    pub users: Vec<User>,
    pub plans: Vec<SubscriptionPlan>,
    pub quizzes: Vec<Quiz>,
    pub shorts: Vec<Short>,
    pub reviews: Vec<Review>,
}

/// Builds the demo data set.
///
/// Foreign keys are wired up here: courses point at the seeded
/// instructors, so joins work out of the box on a fresh store.
pub(crate) fn demo_data() -> Seed {
    let categories = vec![
        Category::new("Development"),
        Category::new("Design"),
        Category::new("Data Science"),
    ];

    let instructors = vec![
        Instructor::new("Ada Deva", "ada@eduboard.example", "argon2$demo"),
        Instructor::new("Marcus Chen", "marcus@eduboard.example", "argon2$demo"),
    ];

    let mut rust_course = Course::new(
        "Rust in Practice",
        "Development",
        instructors[0].id,
        instructors[0].name.clone(),
        PriceType::Paid,
        14999,
        9999,
    );
    rust_course.badge = Some("Bestseller".to_string());
    rust_course.duration = "12h 30m".to_string();
    let mut intro = Section::new("Getting Started");
    intro
        .lessons
        .push(crate::model::Lesson::new("Welcome", 1, "03:00"));
    intro
        .lessons
        .push(crate::model::Lesson::new("Toolchain Setup", 2, "09:45"));
    rust_course.curriculum.push(intro);

    let figma_course = Course::new(
        "Figma Fundamentals",
        "Design",
        instructors[1].id,
        instructors[1].name.clone(),
        PriceType::Free,
        0,
        0,
    );

    let mut user = User::new("Priya Sharma", "priya@example.com", "555-0100");
    user.skills.push("Rust".to_string());
    user.referral.my_referral_code = "PRIYA10".to_string();

    let plans = vec![
        SubscriptionPlan::new("Basic", 1, 9900),
        SubscriptionPlan::new("Pro", 12, 49900),
    ];

    let mut quiz = Quiz::new("Rust Basics", "RST101", 30, 100);
    quiz.description = "Ownership, borrowing, and the basics.".to_string();
    quiz.questions.push(Question::new(
        "Which keyword declares an immutable binding?",
        vec!["let".to_string(), "mut".to_string(), "const fn".to_string()],
        0,
    ));
    quiz.questions.push(Question::new(
        "What does the ? operator do?",
        vec![
            "Panics on error".to_string(),
            "Propagates the error to the caller".to_string(),
            "Ignores the error".to_string(),
        ],
        1,
    ));

    let mut short = Short::new("shorts/ownership-in-60s.mp4", instructors[0].name.clone());
    short.description = "Ownership explained in one minute".to_string();

    let reviews = vec![Review::new(
        "Dev Patel",
        5,
        "The curriculum editor alone is worth it.",
    )];

    Seed {
        categories,
        instructors,
        courses: vec![rust_course, figma_course],
        users: vec![user],
        plans,
        quizzes: vec![quiz],
        shorts: vec![short],
        reviews,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_wires_course_to_instructor() {
        let seed = demo_data();
        for course in &seed.courses {
            assert!(seed.instructors.iter().any(|i| i.id == course.instructor_id));
        }
    }

    #[test]
    fn seed_quiz_has_answerable_questions() {
        let seed = demo_data();
        for quiz in &seed.quizzes {
            for question in &quiz.questions {
                assert!(question.correct_option < question.options.len());
            }
        }
    }
}
