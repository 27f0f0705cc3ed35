//! Integration tests for scoped binding replacement.

use std::sync::{Arc, LazyLock};

use mockwright::prelude::*;

trait Mailer: Send + Sync {
    fn send(&self, to: &str) -> bool;
}

struct SmtpMailer;

impl Mailer for SmtpMailer {
    fn send(&self, _to: &str) -> bool {
        false
    }
}

struct MockMailer(MockObject);

impl Mailer for MockMailer {
    fn send(&self, to: &str) -> bool {
        self.0
            .call("send", args![to])
            .and_then(bool::from_value)
            .unwrap_or(false)
    }
}

static MAILER: LazyLock<Binding<Arc<dyn Mailer>>> =
    LazyLock::new(|| Binding::new(Arc::new(SmtpMailer) as Arc<dyn Mailer>));

fn notify(users: &[&str]) -> usize {
    let mailer = MAILER.get();
    users.iter().filter(|user| mailer.send(user)).count()
}

#[test]
fn test_replaced_collaborator_receives_calls() {
    let mocked = Mock::create();
    mocked
        .setup([setup_function("send").returning(true)])
        .unwrap();

    let mailer: Arc<dyn Mailer> = Arc::new(MockMailer(mocked.mock()));
    {
        let _guard = replace_binding(&MAILER, mailer);
        assert_eq!(notify(&["ada", "grace"]), 2);
    }
    assert_eq!(notify(&["ada"]), 0);

    mocked.with_function("send").unwrap().was_called_times(2).unwrap();
    mocked
        .with_function("send")
        .unwrap()
        .with_parameters(["grace"])
        .was_called_once()
        .unwrap();
}

static ENDPOINT: LazyLock<Binding<String>> =
    LazyLock::new(|| Binding::new("https://prod.invalid".to_string()));
static RETRIES: LazyLock<Binding<u32>> = LazyLock::new(|| Binding::new(3));

#[test]
fn test_scope_restores_after_each_and_all() {
    let mut scope = ReplacementScope::new();
    scope
        .replace_before_all(&ENDPOINT, "http://localhost".to_string())
        .replace_before_each(&RETRIES, 0);

    scope.before_all();
    for _ in 0..3 {
        scope.before_each();
        assert_eq!(*ENDPOINT.get(), "http://localhost");
        assert_eq!(*RETRIES.get(), 0);
        scope.after_each();
        assert_eq!(*RETRIES.get(), 3);
    }
    scope.after_all();

    assert_eq!(*ENDPOINT.get(), "https://prod.invalid");
}
