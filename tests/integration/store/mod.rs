//! Entity store integration tests
