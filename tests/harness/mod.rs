#![allow(dead_code, unused_imports)]

pub(crate) mod fake_toolchain;

pub(crate) use test_context::TestContext;
