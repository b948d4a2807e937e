// src/documents/pdf.rs

use std::{
    io::{Read, Seek, SeekFrom, Write},
    path::PathBuf,
};

use genpdf::{elements, style, Element};

use crate::{
    common::error::AppError,
    documents::preview::{Block, PrintableDocument},
};

/// Conversão do layout do documento para PDF.
pub trait PdfExporter: Send + Sync {
    fn export(&self, doc: &PrintableDocument) -> Result<Vec<u8>, AppError>;
}

/// Exportador baseado em `genpdf`. Cada exportação escreve num arquivo
/// temporário dentro de `staging_dir`, apagado ao sair (sucesso ou erro).
#[derive(Debug, Clone)]
pub struct GenPdfExporter {
    fonts_dir: PathBuf,
    font_family: String,
    staging_dir: PathBuf,
}

impl GenPdfExporter {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: impl Into<String>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
            staging_dir: staging_dir.into(),
        }
    }

    fn build(&self, doc: &PrintableDocument) -> Result<genpdf::Document, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None).map_err(|e| {
            AppError::PdfExport(format!(
                "Fonte '{}' não encontrada em {}: {}",
                self.font_family,
                self.fonts_dir.display(),
                e
            ))
        })?;

        let mut pdf = genpdf::Document::new(font_family);
        pdf.set_title(doc.title.clone());
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(15);
        pdf.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        pdf.push(elements::Paragraph::new(doc.title.clone()).styled(style::Style::new().bold().with_font_size(16)));
        if let Some(subtitle) = &doc.subtitle {
            pdf.push(elements::Paragraph::new(subtitle.clone()).styled(style::Style::new().with_font_size(10)));
        }
        pdf.push(
            elements::Paragraph::new(format!("Status: {}", doc.status_label))
                .styled(style::Style::new().italic().with_font_size(9)),
        );
        pdf.push(elements::Break::new(1.5));

        // --- SEÇÕES ---
        for section in &doc.sections {
            pdf.push(
                elements::Paragraph::new(section.heading.clone()).styled(style::Style::new().bold().with_font_size(12)),
            );
            for block in &section.blocks {
                match block {
                    Block::Field { label, value } => {
                        let mut p = elements::Paragraph::default();
                        p.push_styled(format!("{}: ", label), style::Style::new().bold());
                        p.push(value.clone());
                        pdf.push(p);
                    }
                    Block::Paragraph(text) => pdf.push(elements::Paragraph::new(text.clone())),
                }
            }
            pdf.push(elements::Break::new(1));
        }

        // --- RODAPÉ ---
        if !doc.footer.is_empty() {
            pdf.push(elements::Break::new(1));
            for line in &doc.footer {
                pdf.push(elements::Paragraph::new(line.clone()).styled(style::Style::new().with_font_size(8)));
            }
        }

        Ok(pdf)
    }
}

impl PdfExporter for GenPdfExporter {
    fn export(&self, doc: &PrintableDocument) -> Result<Vec<u8>, AppError> {
        let mut staging = tempfile::Builder::new()
            .prefix("documento-")
            .suffix(".pdf")
            .tempfile_in(&self.staging_dir)
            .map_err(|e| AppError::PdfExport(format!("Falha ao preparar arquivo temporário: {}", e)))?;

        let pdf = self.build(doc)?;

        let file = staging.as_file_mut();
        pdf.render(&mut *file)
            .map_err(|e| AppError::PdfExport(format!("Falha ao renderizar PDF: {}", e)))?;

        let mut bytes = Vec::new();
        file.flush()
            .and_then(|_| file.seek(SeekFrom::Start(0)))
            .and_then(|_| file.read_to_end(&mut bytes))
            .map_err(|e| AppError::PdfExport(format!("Falha ao ler PDF gerado: {}", e)))?;

        tracing::debug!(title = %doc.title, size = bytes.len(), "📄 PDF gerado");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::preview::Section;

    fn sample() -> PrintableDocument {
        PrintableDocument {
            kind: "proposal",
            title: "PROPOSTA COMERCIAL".into(),
            subtitle: None,
            sections: vec![Section {
                class: "client",
                heading: "Cliente".into(),
                blocks: vec![Block::Field { label: "Nome".into(), value: "Maria".into() }],
            }],
            status: "draft",
            status_label: "Rascunho",
            footer: vec![],
        }
    }

    fn staged_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn staging_file_is_removed_when_export_fails() {
        let staging = tempfile::tempdir().unwrap();
        let fonts = staging.path().join("sem-fontes");
        let exporter = GenPdfExporter::new(&fonts, "Roboto", staging.path());

        let result = exporter.export(&sample());

        assert!(matches!(result, Err(AppError::PdfExport(_))));
        assert_eq!(staged_files(staging.path()), 0);
    }

    #[test]
    fn missing_staging_dir_is_an_export_error() {
        let root = tempfile::tempdir().unwrap();
        let exporter = GenPdfExporter::new(root.path(), "Roboto", root.path().join("nao-existe"));

        assert!(matches!(exporter.export(&sample()), Err(AppError::PdfExport(_))));
    }
}
