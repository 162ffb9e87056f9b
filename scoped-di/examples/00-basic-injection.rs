use scoped_di::container::Container;
use scoped_di::instance::ComponentInstancePtr;
use scoped_di::scope::Scope;
use scoped_di::Component;

// this is a dependency, which can be constructed automatically, since it has no fields
#[derive(Component)]
struct TestDependency;

impl TestDependency {
    fn foo(&self) {
        println!("Hello world!");
    }
}

// this is another component, but with a dependency
#[derive(Component)]
struct TestComponent {
    // the container will construct TestDependency first, and then pass it here
    dependency: ComponentInstancePtr<TestDependency>,
}

impl TestComponent {
    fn call_foo(&self) {
        self.dependency.foo();
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let mut container = Container::new();

    // registering a component builds it right away, along with its dependencies
    container
        .provide::<TestComponent>(Scope::Local)
        .expect("error providing TestComponent");

    // components which were never registered are provided on first request, so this would also
    // work without the call above
    let component = container
        .require::<TestComponent>()
        .expect("error creating TestComponent");

    // prints "Hello world!"
    component.call_foo();
}
