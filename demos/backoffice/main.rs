//! Admin Back-Office Walkthrough
//!
//! Demonstrates the Eduboard store end to end:
//! - Catalog management (categories, courses, curriculum)
//! - Enrollments joined to courses by id
//! - Revenue and student-count aggregates
//! - Quiz grading, wallets, and referrals
//! - Integrity reporting after a cascade-free delete
//!
//! Run with: cargo run -p backoffice

use eduboard_core::{
    AccessType, Category, Config, Course, Instructor, Lesson, Payment, PriceType, Question, Quiz,
    Store, StoreError, User,
};
use eduboard_storage::MemoryBackend;

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    println!("Eduboard Back-Office Walkthrough");
    println!("================================\n");

    let store = Store::open(
        Box::new(MemoryBackend::new()),
        Config::default().seed_on_empty(false),
    );

    // ========================================================================
    // Catalog: categories, instructors, courses
    // ========================================================================
    println!("[+] Building the catalog...");

    store.add_category(Category::new("Development"))?;
    store.add_category(Category::new("Design"))?;

    let ada = store.add_instructor(Instructor::new("Ada Verma", "ada@eduboard.example", "hash"))?;
    let dev = store.add_instructor(Instructor::new("Dev Nair", "dev@eduboard.example", "hash"))?;

    let rust_course = store.add_course(Course::new(
        "Rust in Practice",
        "Development",
        ada.id,
        "",
        PriceType::Paid,
        24_900,
        19_900,
    ))?;
    let design_course = store.add_course(Course::new(
        "Interface Design Basics",
        "Design",
        dev.id,
        "",
        PriceType::Paid,
        14_900,
        9_900,
    ))?;
    let free_course = store.add_course(Course::new(
        "Intro to Programming",
        "Development",
        ada.id,
        "",
        PriceType::Free,
        0,
        0,
    ))?;

    // Curriculum: sections and lessons
    let course = store.add_section(rust_course.id, "Getting Started")?;
    let intro = course.curriculum[0].id;
    let course = store.add_section(rust_course.id, "Ownership")?;
    let ownership = course.curriculum[1].id;
    store.add_lesson(rust_course.id, intro, Lesson::new("Installing the toolchain", 1, "08:30"))?;
    store.add_lesson(rust_course.id, intro, Lesson::new("Hello, Cargo", 2, "12:10"))?;
    let course = store.add_lesson(
        rust_course.id,
        ownership,
        Lesson::new("Moves and borrows", 1, "21:45"),
    )?;

    println!(
        "    {} courses, {} lessons in \"{}\"",
        store.list_courses().len(),
        course.lesson_count(),
        course.title
    );

    // ========================================================================
    // Students and enrollments
    // ========================================================================
    println!("\n[+] Enrolling students...");

    let priya = store.add_user(User::new("Priya Sharma", "priya@example.com", "555-0100"))?;
    let rohan = store.add_user(User::new("Rohan Gupta", "rohan@example.com", "555-0101"))?;
    let meera = store.add_user(User::new("Meera Iyer", "meera@example.com", "555-0102"))?;

    let mut payment = Payment::free();
    payment.price = 19_900;
    payment.original_price = 24_900;
    payment.payment_mode = "upi".to_string();
    store.enroll_course(priya.id, rust_course.id, AccessType::Paid, payment.clone())?;
    store.enroll_course(rohan.id, rust_course.id, AccessType::Paid, payment)?;
    store.enroll_course(meera.id, free_course.id, AccessType::Free, Payment::free())?;

    let mut payment = Payment::free();
    payment.price = 9_900;
    store.enroll_course(priya.id, design_course.id, AccessType::Paid, payment)?;

    // ========================================================================
    // Aggregates
    // ========================================================================
    println!("\n[#] Revenue and enrollment figures:");

    for course in store.list_courses() {
        println!(
            "    {:28} {:>3} students {:>12}",
            course.title,
            store.course_student_count(course.id)?,
            format_cents(store.course_revenue(course.id)?),
        );
    }
    println!(
        "    {:28} {:>16}",
        "Ada's total revenue",
        format_cents(store.instructor_revenue(ada.id)?)
    );

    // ========================================================================
    // Quiz grading
    // ========================================================================
    println!("\n[?] Grading a quiz attempt...");

    let mut quiz = Quiz::new("Ownership Basics", "OWN-101", 15, 20);
    quiz.questions = vec![
        Question::new("Who owns a moved value?", vec!["Caller".into(), "Callee".into()], 1),
        Question::new("Borrows may outlive the owner", vec!["True".into(), "False".into()], 1),
    ];
    let quiz = store.add_quiz(quiz)?;

    let answers = quiz
        .questions
        .iter()
        .map(|q| eduboard_core::Answer {
            question_id: q.id,
            selected_option: 1,
        })
        .collect();
    let attempt = store.record_attempt(quiz.id, priya.id, answers)?;
    println!(
        "    {} scored {}/{} ({}%, {:?})",
        attempt.student_name, attempt.marks, attempt.total_marks, attempt.percentage,
        attempt.status
    );

    // ========================================================================
    // Wallets
    // ========================================================================
    println!("\n[~] Wallet activity for {}...", priya.name);

    store.credit_wallet(priya.id, 5_000, "Referral bonus")?;
    store.credit_wallet(priya.id, 2_500, "Quiz reward")?;
    store.withdraw_from_wallet(priya.id, 3_000, "Payout to bank")?;

    let (balance, warning) = store.wallet_balance(priya.id)?;
    println!(
        "    balance {} (drift: {})",
        format_cents(balance),
        warning.map_or("none".to_string(), |w| w.to_string())
    );

    // ========================================================================
    // JSON patch update
    // ========================================================================
    println!("\n[~] Discounting \"{}\" via patch...", rust_course.title);

    let patched = store.update_course(
        rust_course.id,
        serde_json::json!({ "current_price": 14_900, "badge": "Sale" }),
    )?;
    println!(
        "    {} -> {} ({})",
        format_cents(rust_course.current_price),
        format_cents(patched.current_price),
        patched.badge.as_deref().unwrap_or("no badge")
    );

    // ========================================================================
    // Cascade-free delete and the integrity report
    // ========================================================================
    println!("\n[!] Removing \"{}\" (enrollments retained)...", design_course.title);

    store.remove_course(design_course.id)?;
    let report = store.integrity_report();
    for warning in &report {
        println!("    warning: {warning}");
    }

    // ========================================================================
    // Summary
    // ========================================================================
    println!("\n[*] Store contents:");
    println!("    Categories:         {:>4}", store.list_categories().len());
    println!("    Instructors:        {:>4}", store.list_instructors().len());
    println!("    Courses:            {:>4}", store.list_courses().len());
    println!("    Users:              {:>4}", store.list_users().len());
    println!("    Course enrollments: {:>4}", store.list_course_enrollments().len());
    println!("    Quizzes:            {:>4}", store.list_quizzes().len());
    println!("    Integrity findings: {:>4}", report.len());

    Ok(())
}
