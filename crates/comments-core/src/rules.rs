// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::rule::CommentRule;

pub mod no_empty;
pub mod own_line;
pub mod whitespace_inside;

/// All builtin rules, in a stable order.
pub fn builtin_rules() -> Vec<Box<dyn CommentRule>> {
    vec![
        Box::new(whitespace_inside::WhitespaceInside),
        Box::new(no_empty::NoEmpty),
        Box::new(own_line::OwnLine),
    ]
}
