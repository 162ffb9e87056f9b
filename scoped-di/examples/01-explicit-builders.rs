// note: this example assumes you've analyzed the previous one

use scoped_di::container::Container;
use scoped_di::instance::ComponentInstancePtr;
use scoped_di::scope::Scope;
use scoped_di::{injectable, Component};

// traits cannot be constructed automatically, since the container doesn't know which
// implementation to choose
#[injectable]
trait TestTrait {
    fn foo(&self);
}

struct TestImplementation {
    message: String,
}

impl TestTrait for TestImplementation {
    fn foo(&self) {
        println!("{}", self.message);
    }
}

#[derive(Component)]
struct TestComponent {
    dependency: ComponentInstancePtr<dyn TestTrait>,
    // optional dependencies are None when they can't be resolved
    missing: Option<ComponentInstancePtr<String>>,
}

//noinspection DuplicatedCode
fn main() {
    let mut container = Container::new();

    // without this registration, requiring TestComponent would fail, since dyn TestTrait is not
    // constructible
    container
        .provide_with::<dyn TestTrait, _>(
            |_| {
                Ok(Box::new(TestImplementation {
                    message: "Hello world!".to_string(),
                }) as Box<dyn TestTrait>)
            },
            Scope::Local,
        )
        .expect("error providing dyn TestTrait");

    let component = container
        .require::<TestComponent>()
        .expect("error creating TestComponent");

    // prints "Hello world!"
    component.dependency.foo();
    // prints "true"
    println!("{}", component.missing.is_none());
}
