//! Export titles and file names

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HisabError;

/// The two kinds of report the dashboard produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    FinancialReport,
    Invoices,
}

impl ReportKind {
    /// Display name used in titles and file names
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportKind::FinancialReport => "التقرير المالي",
            ReportKind::Invoices => "الفواتير",
        }
    }

    /// Columns shown first, in this order, when present
    pub fn preferred_columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::FinancialReport => &[
                "مواد اوليه",
                "اسم المورد",
                "رقم الفاتورة",
                "تاريخ الفاتورة",
                "المبلغ",
                "كميه زجاج متر مربع",
                "كميه المونيوم طن",
                "كميه اكسسوار",
                "كميه ستيل طن",
                "مجموع الكمية لكل مشروع ومورد",
                "مجموع المبلغ لكل مشروع ومورد",
            ],
            ReportKind::Invoices => &[
                "مواد اوليه",
                "اسم المورد",
                "رقم الفاتورة",
                "تاريخ الفاتورة",
                "المبلغ",
                "الكمية",
                "رابط نسخة الفاتورة",
            ],
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = HisabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "financial_report" | "financial" => Ok(ReportKind::FinancialReport),
            "invoices" | "invoice" => Ok(ReportKind::Invoices),
            other => Err(HisabError::InvalidInput(format!(
                "unknown report kind: {}",
                other
            ))),
        }
    }
}

/// Filter selections an export was produced under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportContext {
    pub company: String,
    pub project: String,
    pub kind: Option<ReportKind>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ExportContext {
    pub fn new(company: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            project: project.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Compose the export caption.
    ///
    /// `الشركة: … | المشروع: … | النوع: … | الفترة: from ← to`, omitting empty
    /// parts and showing `—` for a missing date bound.
    pub fn title(&self) -> String {
        let mut parts = Vec::new();
        if !self.company.is_empty() {
            parts.push(format!("الشركة: {}", self.company));
        }
        if !self.project.is_empty() {
            parts.push(format!("المشروع: {}", self.project));
        }
        if let Some(kind) = self.kind {
            parts.push(format!("النوع: {}", kind.display_name()));
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let bound = |d: Option<NaiveDate>| {
                d.map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "—".to_string())
            };
            parts.push(format!(
                "الفترة: {} ← {}",
                bound(self.date_from),
                bound(self.date_to)
            ));
        }
        parts.join(" | ")
    }

    /// Suggested file name: `{kind}_{company}_{project}.{extension}`
    pub fn filename(&self, extension: &str) -> String {
        let kind = self.kind.map(|k| k.display_name()).unwrap_or("export");
        safe_filename(&format!(
            "{}_{}_{}.{}",
            kind, self.company, self.project, extension
        ))
    }
}

/// Replace characters that are not allowed in file names on common
/// filesystems.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '|' => '-',
            '"' => '\'',
            '<' => '(',
            '>' => ')',
            other => other,
        })
        .collect()
}
