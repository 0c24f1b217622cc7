// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::rule::{RuleCategory, RuleSeverity};
use common::model::position::Position;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, Clone, Builder)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    pub severity: RuleSeverity,
    pub category: RuleCategory,
    pub start: Position,
    pub end: Position,
}
