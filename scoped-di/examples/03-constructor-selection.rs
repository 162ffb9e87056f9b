// note: this example assumes you've analyzed the previous ones

use scoped_di::container::Container;
use scoped_di::instance::{error_ptr, ComponentInstancePtr, ErrorPtr};
use scoped_di::{component_constructors, Component};
use std::fmt::{Display, Formatter};

#[derive(Component)]
struct TestDependency;

// sometimes there's a need to do some work during construction, so dedicated constructors are
// more convenient than deriving Component
struct TestComponent {
    message: String,
}

// the container picks the constructor with the fewest parameters, as long as no other constructor
// has the same number of them
#[component_constructors]
impl TestComponent {
    // both single-parameter constructors are ambiguous, so they are skipped
    #[allow(dead_code)]
    fn with_dependency(_dependency: ComponentInstancePtr<TestDependency>) -> Self {
        Self {
            message: "with dependency".to_string(),
        }
    }

    #[allow(dead_code)]
    fn with_optional_dependency(_dependency: Option<ComponentInstancePtr<TestDependency>>) -> Self {
        Self {
            message: "with optional dependency".to_string(),
        }
    }

    // this one is selected
    fn new(
        _first: ComponentInstancePtr<TestDependency>,
        _second: ComponentInstancePtr<TestDependency>,
    ) -> Self {
        Self {
            message: "Hello world!".to_string(),
        }
    }

    // ignored constructors are never considered
    #[component(ignore)]
    #[allow(dead_code)]
    fn empty() -> Self {
        Self {
            message: String::new(),
        }
    }
}

#[derive(Debug)]
struct TestError;

impl Display for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("not today")
    }
}

impl std::error::Error for TestError {}

struct TestFallibleComponent;

#[component_constructors]
impl TestFallibleComponent {
    // constructors can also fail - the error is forwarded to the caller
    fn new() -> Result<Self, ErrorPtr> {
        Err(error_ptr(TestError))
    }
}

//noinspection DuplicatedCode
fn main() {
    // prints "2"
    println!("{}", <TestComponent as scoped_di::component::Component>::signature().arity());

    let mut container = Container::new();

    let component = container
        .require::<TestComponent>()
        .expect("error creating TestComponent");

    // prints "Hello world!"
    println!("{}", component.message);

    // prints the construction error, ending with "TestFallibleComponent: not today"
    if let Err(error) = container.require::<TestFallibleComponent>() {
        println!("{error}");
    }
}
