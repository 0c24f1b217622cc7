// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

pub mod common;
pub mod constants;
pub mod context;
pub mod engine;
pub mod location;
pub mod record;
pub mod rule;
pub mod rules;
pub mod scanner;
pub mod violation;

pub use engine::{Engine, EngineBuilder, EngineError, FileAnalysis};
pub use record::{Comment, CommentKind};
pub use scanner::find_comments;
