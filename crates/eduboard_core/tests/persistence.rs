//! End-to-end persistence tests: every mutation through the store must
//! survive closing and reopening over the same directory.

use eduboard_core::{
    AccessType, Category, Config, Course, Instructor, Payment, PriceType, Status, Store, User,
};
use eduboard_storage::DirBackend;

fn open_dir_store(path: &std::path::Path, seed: bool) -> Store {
    let backend = DirBackend::open(path).unwrap();
    Store::open(Box::new(backend), Config::default().seed_on_empty(seed))
}

#[test]
fn mutations_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (course_id, user_id, enrollment_id) = {
        let store = open_dir_store(dir.path(), false);
        let instructor = store
            .add_instructor(Instructor::new("Ada", "ada@example.com", "hash"))
            .unwrap();
        let course = store
            .add_course(Course::new(
                "Rust in Practice",
                "Development",
                instructor.id,
                "Ada",
                PriceType::Paid,
                200,
                150,
            ))
            .unwrap();
        let user = store
            .add_user(User::new("Priya", "priya@example.com", "555-0100"))
            .unwrap();
        let mut payment = Payment::free();
        payment.price = 150;
        let enrollment = store
            .enroll_course(user.id, course.id, AccessType::Paid, payment)
            .unwrap();
        store.credit_wallet(user.id, 2500, "Signup bonus").unwrap();
        (course.id, user.id, enrollment.id)
    };

    let store = open_dir_store(dir.path(), false);

    let course = store.get_course(course_id).unwrap();
    assert_eq!(course.title, "Rust in Practice");
    assert_eq!(course.current_price, 150);

    // The enrollment index is rebuilt from the persisted foreign keys
    let enrollments = store.enrollments_for_course(course_id);
    assert_eq!(enrollments.len(), 1);
    assert_eq!(enrollments[0].id, enrollment_id);
    assert_eq!(store.course_revenue(course_id).unwrap(), 150);

    let (balance, warning) = store.wallet_balance(user_id).unwrap();
    assert_eq!(balance, 2500);
    assert!(warning.is_none());
}

#[test]
fn toggled_status_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let category_id = {
        let store = open_dir_store(dir.path(), false);
        let category = store.add_category(Category::new("Design")).unwrap();
        store.toggle_category_status(category.id).unwrap();
        category.id
    };

    let store = open_dir_store(dir.path(), false);
    let category = store
        .list_categories()
        .into_iter()
        .find(|c| c.id == category_id)
        .unwrap();
    assert_eq!(category.status, Status::Disabled);
}

#[test]
fn removal_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let kept_id = {
        let store = open_dir_store(dir.path(), false);
        let kept = store.add_category(Category::new("Design")).unwrap();
        let removed = store.add_category(Category::new("Marketing")).unwrap();
        store.remove_category(removed.id).unwrap();
        kept.id
    };

    let store = open_dir_store(dir.path(), false);
    let categories = store.list_categories();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, kept_id);
}

#[test]
fn seed_is_written_once_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();

    let first_courses = {
        let store = open_dir_store(dir.path(), true);
        store.list_courses()
    };
    assert!(!first_courses.is_empty());

    // A second open must load the persisted seed, not generate fresh ids
    let store = open_dir_store(dir.path(), true);
    let second_courses = store.list_courses();
    assert_eq!(
        first_courses.iter().map(|c| c.id).collect::<Vec<_>>(),
        second_courses.iter().map(|c| c.id).collect::<Vec<_>>()
    );
}

#[test]
fn second_store_on_same_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let _store = open_dir_store(dir.path(), false);

    assert!(DirBackend::open(dir.path()).is_err());
}
