//! Component palette and detail-form types.

use serde::Serialize;
use solcanvas_core::template::TemplateInfo;
use solcanvas_core::{ComponentKind, FieldSpec};

/// Response for listing the palette.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
}

/// Field layout of one component kind's detail form.
#[derive(Debug, Clone, Serialize)]
pub struct FormResponse {
    pub kind: ComponentKind,
    pub fields: &'static [FieldSpec],
}
