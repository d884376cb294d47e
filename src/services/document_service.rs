// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TransactionRepository,
    models::transaction::TransactionKind,
};

// Gera o recibo/espelho de uma transação em PDF, com QR code do código
// para conferência rápida no balcão.
#[derive(Clone)]
pub struct DocumentService {
    transaction_repo: TransactionRepository,
    pool: PgPool,
    company_name: String,
}

impl DocumentService {
    pub fn new(transaction_repo: TransactionRepository, pool: PgPool, company_name: String) -> Self {
        Self {
            transaction_repo,
            pool,
            company_name,
        }
    }

    /// Retorna (nome do arquivo, bytes do PDF).
    pub async fn transaction_pdf(&self, id: Uuid) -> Result<(String, Vec<u8>), AppError> {
        // 1. Busca os dados
        let transaction = self
            .transaction_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;
        let items = self
            .transaction_repo
            .list_items(&self.pool, transaction.id)
            .await?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Transação {}", transaction.code));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(self.company_name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        doc.push(elements::Break::new(1.5));

        let kind_label = match transaction.kind {
            TransactionKind::Sale => "VENDA",
            TransactionKind::Purchase => "COMPRA",
        };
        let counterparty_label = match transaction.kind {
            TransactionKind::Sale => "Cliente",
            TransactionKind::Purchase => "Fornecedor",
        };

        doc.push(
            elements::Paragraph::new(format!("{} {}", kind_label, transaction.code))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            transaction.created_at.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "{}: {}",
            counterparty_label, transaction.counterparty_name
        )));
        doc.push(elements::Paragraph::new(format!(
            "Status: {}",
            transaction.status
        )));

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Produto (4), Qtd (1), Unitário (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Produto").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Unitário").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        for item in &items {
            table
                .row()
                .element(elements::Paragraph::new(item.product_name.clone()))
                .element(elements::Paragraph::new(item.quantity.to_string()))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.unit_price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.line_total)))
                .push()
                .map_err(|e| AppError::PdfError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        for (label, value) in [
            ("Subtotal", transaction.subtotal),
            ("Impostos", transaction.tax_amount),
        ] {
            let mut paragraph = elements::Paragraph::new(format!("{}: R$ {:.2}", label, value));
            paragraph.set_alignment(genpdf::Alignment::Right);
            doc.push(paragraph);
        }

        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL GERAL: R$ {:.2}", transaction.total_amount));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- QR CODE ---
        let code = QrCode::new(transaction.code.as_bytes())
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::PdfError(e.to_string()))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        if let Some(notes) = &transaction.notes {
            doc.push(elements::Break::new(1));
            doc.push(
                elements::Paragraph::new(format!("Obs: {}", notes))
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        let filename = format!("transacao_{}.pdf", transaction.code);
        Ok((filename, buffer))
    }
}
