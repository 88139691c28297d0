//! Export entry point
//!
//! [`ReportExporter`] ties the pieces together: it classifies the result
//! once, resolves branding assets, composes the title and file name from the
//! [`ExportContext`] and hands the table to the renderer for the requested
//! format.

use hisab_core::{ClassifiedTable, ExportContext, TabularResult};

use crate::assets::{AssetResolver, BrandingAssets};
use crate::csv_export::render_delimited;
use crate::error::Result;
use crate::output::{ExportFormat, RenderedDocument};
use crate::pdf_export::render_document;
use crate::settings::ExportSettings;
use crate::xlsx_export::{render_spreadsheet, spreadsheet_available};

/// Produces export payloads for query results
#[derive(Debug, Clone)]
pub struct ReportExporter {
    settings: ExportSettings,
    resolver: AssetResolver,
}

impl ReportExporter {
    pub fn new(settings: ExportSettings) -> Self {
        let resolver = AssetResolver::new(settings.assets.clone());
        Self { settings, resolver }
    }

    /// Use a specific asset resolver instead of the configured search paths
    pub fn with_resolver(mut self, resolver: AssetResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Draw the logo banner in spreadsheets
    pub fn with_logo(mut self, include_logo: bool) -> Self {
        self.settings.include_logo = include_logo;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Formats this build can produce
    pub fn available_formats(&self) -> Vec<ExportFormat> {
        ExportFormat::ALL
            .into_iter()
            .filter(|f| *f != ExportFormat::Spreadsheet || spreadsheet_available())
            .collect()
    }

    /// Render `result` in one format.
    ///
    /// Returns `Ok(None)` only when the spreadsheet writer is not part of
    /// this build.
    #[tracing::instrument(skip(self, result, context), fields(
        format = %format,
        columns = result.column_count(),
        rows = result.row_count(),
    ))]
    pub fn export(
        &self,
        result: &TabularResult,
        context: &ExportContext,
        format: ExportFormat,
    ) -> Result<Option<RenderedDocument>> {
        let table = ClassifiedTable::new(result);
        let branding = self.branding_for(format);
        self.render(&table, context, format, &branding)
    }

    /// Render `result` in every available format, sharing one
    /// classification and one asset lookup
    #[tracing::instrument(skip(self, result, context), fields(
        columns = result.column_count(),
        rows = result.row_count(),
    ))]
    pub fn export_all(
        &self,
        result: &TabularResult,
        context: &ExportContext,
    ) -> Result<Vec<RenderedDocument>> {
        let table = ClassifiedTable::new(result);
        let branding = self.resolver.branding();
        let mut documents = Vec::new();
        for format in ExportFormat::ALL {
            if let Some(doc) = self.render(&table, context, format, &branding)? {
                documents.push(doc);
            }
        }
        Ok(documents)
    }

    /// Delimited exports draw nothing, so they skip the asset lookup
    fn branding_for(&self, format: ExportFormat) -> BrandingAssets {
        match format {
            ExportFormat::Csv => BrandingAssets::none(),
            ExportFormat::Spreadsheet | ExportFormat::Pdf => self.resolver.branding(),
        }
    }

    fn render(
        &self,
        table: &ClassifiedTable<'_>,
        context: &ExportContext,
        format: ExportFormat,
        branding: &BrandingAssets,
    ) -> Result<Option<RenderedDocument>> {
        let title = context.title();
        let bytes = match format {
            ExportFormat::Csv => Some(render_delimited(table.result())?),
            ExportFormat::Pdf => Some(render_document(table, &title, branding, &self.settings)?),
            ExportFormat::Spreadsheet => render_spreadsheet(
                table,
                &title,
                self.settings.include_logo,
                branding,
                &self.settings,
            )?,
        };

        let Some(bytes) = bytes else {
            tracing::warn!(format = %format, "Export format unavailable");
            return Ok(None);
        };
        let document = RenderedDocument::new(bytes, format, context.filename(format.extension()));
        tracing::info!(
            format = %format,
            filename = document.filename(),
            bytes = document.len(),
            "Export rendered"
        );
        Ok(Some(document))
    }
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new(ExportSettings::default())
    }
}
