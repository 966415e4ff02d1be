#[cfg(any(feature = "system_tests", feature = "load_tests"))]
mod backend;
