use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rebind_native::entity;
use rebind_sdk::{
    init_module, BindingOptions, CallError, DynValue, ErrorKind, FromDynamic, HostError, HostRuntime,
    LocalHost, ModuleError, ToDynamic, TypeTag,
};

static REPORTS: AtomicUsize = AtomicUsize::new(0);
static TRACE: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

#[entity(name = "sample")]
mod sample {
    use std::sync::atomic::Ordering;

    use super::{REPORTS, TRACE};

    #[allow(dead_code)]
    pub static COUNTER: i32 = 0;

    /// Adds two numbers.
    pub fn sum(a: i32, b: i32) -> i32 {
        a + b
    }

    pub fn greeting() -> String {
        "Hello, World!".to_string()
    }

    /// Records one report.
    pub fn report() {
        REPORTS.fetch_add(1, Ordering::SeqCst);
    }

    pub fn f() -> i32 {
        TRACE.lock().unwrap().push("f");
        1
    }

    pub fn g() -> i32 {
        TRACE.lock().unwrap().push("g");
        2
    }

    #[rebind(name = "add")]
    pub fn plus(a: i64, b: i64) -> i64 {
        a + b
    }

    #[rebind(skip)]
    #[allow(dead_code)]
    pub fn hidden() {}

    #[allow(dead_code)]
    pub fn first(s: &str) -> usize {
        s.len()
    }

    pub fn divide(a: f64, b: f64) -> Result<f64, String> {
        if b == 0.0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    }

    pub fn fail() -> bool {
        panic!("native failure")
    }

    pub fn is_zero(f: f32) -> bool {
        f <= 0.001
    }
}

#[entity]
mod shadow {
    /// Collides with the module's own doc attribute.
    #[allow(non_snake_case)]
    pub fn __doc__() -> i32 {
        0
    }
}

#[entity]
mod empty {
    #[allow(dead_code)]
    pub const NOTHING: () = ();
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discovery_order_and_filtering() {
    let registry = sample::REBIND_ENTITY.registry();
    assert_eq!(
        registry.names(),
        ["sum", "greeting", "report", "f", "g", "add", "divide", "fail", "is_zero"]
    );
    assert_eq!(
        registry.skipped(),
        &[("first", "reference parameters are not supported")]
    );
    assert!(!registry.contains("COUNTER"));
    assert!(!registry.contains("hidden"));
    assert!(!registry.contains("plus"));
}

#[test]
fn test_registry_memoized() {
    let first = sample::REBIND_ENTITY.registry();
    let second = sample::REBIND_ENTITY.registry();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_doc_extraction() {
    let registry = sample::REBIND_ENTITY.registry();
    assert_eq!(registry.get("sum").unwrap().doc(), "Adds two numbers.");
    assert_eq!(registry.get("greeting").unwrap().doc(), "greeting() -> str");
    assert_eq!(registry.get("add").unwrap().doc(), "add(i64, i64) -> i64");
}

#[test]
fn test_signature_metadata() {
    let sum = sample::REBIND_ENTITY.registry().get("sum").unwrap();
    assert_eq!(sum.arity(), 2);
    assert_eq!(sum.signature().params(), &[TypeTag::I32, TypeTag::I32]);
    assert_eq!(sum.signature().return_type(), TypeTag::I32);
}

#[test]
fn test_empty_entity_installs_empty_module() {
    let host = LocalHost::new();
    let module = init_module(&host, "empty", &empty::REBIND_ENTITY, BindingOptions::default()).unwrap();
    assert_eq!(module.functions().count(), 0);
    assert_eq!(module.attribute_names(), ["__name__", "__doc__"]);
}

// ============================================================================
// Calls through the host
// ============================================================================

#[test]
fn test_sum_scenarios() {
    let host = LocalHost::new();
    let module = init_module(&host, "sums", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap();
    let sum = module.function("sum").unwrap();

    assert_eq!(sum.call(&[DynValue::long(2), DynValue::long(3)]), Ok(DynValue::long(5)));

    let err = sum.call(&[DynValue::long(2)]).unwrap_err();
    assert_eq!(
        err,
        CallError::ArgumentCountMismatch {
            function: "sum",
            expected: 2,
            got: 1,
        }
    );
    assert_eq!(err.kind().message(), "argument count mismatch");

    let err = sum.call(&[DynValue::str("a"), DynValue::str("b")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
    assert!(matches!(err, CallError::ArgumentTypeMismatch { index: 0, .. }));
}

#[test]
fn test_greeting_length() {
    let greeting = sample::REBIND_ENTITY.registry().get("greeting").unwrap();
    let value = greeting.call(&[]).unwrap();
    assert_eq!(value.as_str().map(str::len), Some(13));
}

#[test]
fn test_void_function_runs_once_per_call() {
    let report = sample::REBIND_ENTITY.registry().get("report").unwrap();
    let before = REPORTS.load(Ordering::SeqCst);
    assert_eq!(report.call(&[]), Ok(DynValue::None));
    assert_eq!(REPORTS.load(Ordering::SeqCst), before + 1);

    // rejected calls never reach the function
    assert!(report.call(&[DynValue::long(1)]).is_err());
    assert_eq!(REPORTS.load(Ordering::SeqCst), before + 1);
}

#[test]
fn test_interleaved_calls_observe_their_own_effects() {
    let registry = sample::REBIND_ENTITY.registry();
    let f = registry.get("f").unwrap();
    let g = registry.get("g").unwrap();

    TRACE.lock().unwrap().clear();
    assert_eq!(f.call(&[]), Ok(DynValue::i32(1)));
    assert_eq!(g.call(&[]), Ok(DynValue::i32(2)));
    assert_eq!(f.call(&[]), Ok(DynValue::i32(1)));

    let trace = TRACE.lock().unwrap();
    let tail: Vec<_> = trace.iter().rev().take(3).rev().copied().collect();
    assert_eq!(tail, ["f", "g", "f"]);
}

#[test]
fn test_renamed_function_callable() {
    let add = sample::REBIND_ENTITY.registry().get("add").unwrap();
    assert_eq!(add.call(&[DynValue::long(40), DynValue::long(2)]), Ok(DynValue::i64(42)));
}

#[test]
fn test_result_and_panic_become_faults() {
    let registry = sample::REBIND_ENTITY.registry();

    let divide = registry.get("divide").unwrap();
    assert_eq!(
        divide.call(&[DynValue::float(1.0), DynValue::float(4.0)]),
        Ok(DynValue::float(0.25))
    );
    let err = divide.call(&[DynValue::float(1.0), DynValue::float(0.0)]).unwrap_err();
    assert_eq!(
        err,
        CallError::NativeFault {
            function: "divide",
            message: "division by zero".to_string(),
        }
    );

    let err = registry.get("fail").unwrap().call(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NativeFault);

    // the descriptor stays usable after a fault
    assert_eq!(divide.call(&[DynValue::float(2.0), DynValue::float(1.0)]), Ok(DynValue::float(2.0)));
}

#[test]
fn test_float_argument_requires_float() {
    let is_zero = sample::REBIND_ENTITY.registry().get("is_zero").unwrap();
    assert_eq!(is_zero.call(&[DynValue::float(0.0005)]), Ok(DynValue::bool(true)));
    assert_eq!(is_zero.call(&[DynValue::float(1.0)]), Ok(DynValue::bool(false)));

    let err = is_zero.call(&[DynValue::long(0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
}

#[test]
fn test_keywords_rejected_through_host() {
    let host = LocalHost::new();
    let module = init_module(&host, "kw", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap();
    let kwargs = [("a".to_string(), DynValue::long(1))];
    let err = module
        .function("sum")
        .unwrap()
        .call_with_keywords(&[DynValue::long(1), DynValue::long(2)], &kwargs)
        .unwrap_err();
    assert_eq!(err.kind().message(), "keyword arguments are not supported");
}

#[test]
fn test_concurrent_calls() {
    let host = LocalHost::new();
    let module = init_module(&host, "threads", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap();
    let sum = module.function("sum").unwrap();

    std::thread::scope(|scope| {
        for t in 0..4i64 {
            scope.spawn(move || {
                for i in 0..100i64 {
                    let result = sum.call(&[DynValue::long(t), DynValue::long(i)]).unwrap();
                    assert_eq!(result, DynValue::long(t + i));
                }
            });
        }
    });
}

#[test]
fn test_registry_shared_across_threads() {
    let registries: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| sample::REBIND_ENTITY.registry() as *const _ as usize))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(registries.windows(2).all(|w| w[0] == w[1]));
}

// ============================================================================
// Module loading failures
// ============================================================================

#[test]
fn test_collision_is_registration_failure() {
    let host = LocalHost::new();
    let err = init_module(&host, "shadow", &shadow::REBIND_ENTITY, BindingOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ModuleError::RegistrationFailure {
            module: "shadow".to_string(),
            function: "__doc__".to_string(),
            source: HostError::DuplicateAttribute("__doc__".to_string()),
        }
    );
    assert_eq!(err.kind().message(), "failed to register function");
}

#[test]
fn test_module_creation_failure() {
    let host = LocalHost::new();
    host.create_module("taken").unwrap();

    let err = init_module(&host, "taken", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModuleCreationFailure);

    let err = init_module(&host, "", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap_err();
    assert_eq!(err.kind().message(), "failed to create module");
}

#[test]
fn test_same_entity_installed_twice() {
    let host = LocalHost::new();
    let a = init_module(&host, "one", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap();
    let b = init_module(&host, "two", &sample::REBIND_ENTITY, BindingOptions::default()).unwrap();
    assert!(std::ptr::eq(
        a.function("sum").unwrap().callable(),
        b.function("sum").unwrap().callable()
    ));
}

// ============================================================================
// Marshaling laws
// ============================================================================

fn round_trip<T>(value: T) -> T
where
    T: ToDynamic + FromDynamic,
{
    let dynamic = value.to_dynamic().unwrap();
    T::from_dynamic(&dynamic, &BindingOptions::default()).unwrap()
}

#[test]
fn test_round_trip() {
    assert_eq!(round_trip(i32::MIN), i32::MIN);
    assert_eq!(round_trip(u64::MAX), u64::MAX);
    assert_eq!(round_trip(-7i8), -7i8);
    assert_eq!(round_trip(1.5f64), 1.5f64);
    assert!(round_trip(true));
    assert_eq!(round_trip("héllo".to_string()), "héllo");
    assert_eq!(round_trip(Some(3u16)), Some(3u16));
    assert_eq!(round_trip(None::<i64>), None);
}
