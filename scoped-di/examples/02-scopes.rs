// note: this example assumes you've analyzed the previous ones

use scoped_di::container::Container;
use scoped_di::instance::ComponentInstancePtr;
use scoped_di::scope::Scope;
use scoped_di::Component;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

// every instance remembers the order in which it was created
#[derive(Component)]
struct TestConnectionPool {
    #[component(default = "next_id")]
    id: usize,
}

#[derive(Component)]
struct TestRequestContext {
    #[component(default = "next_id")]
    id: usize,
}

//noinspection DuplicatedCode
fn main() {
    let mut root = Container::new();

    // singletons are shared by the container and all its descendants
    root.provide::<TestConnectionPool>(Scope::Singleton)
        .expect("error providing TestConnectionPool");
    // local components are rebuilt in every child container
    root.provide::<TestRequestContext>(Scope::Local)
        .expect("error providing TestRequestContext");

    for _ in 0..2 {
        // a child container is typically created for a unit of work, e.g. a request
        let mut child = root.create_scope();

        let pool: ComponentInstancePtr<TestConnectionPool> = child
            .require()
            .expect("error creating TestConnectionPool");
        let context: ComponentInstancePtr<TestRequestContext> = child
            .require()
            .expect("error creating TestRequestContext");

        // prints "pool: 0, context: 2" and then "pool: 0, context: 3"
        println!("pool: {}, context: {}", pool.id, context.id);
    }

    // note: the root container owns the singleton, so it needs to outlive its children
}
