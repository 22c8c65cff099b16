#![allow(dead_code)]

use std::error::Error;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calamine::{open_workbook_from_rs, Reader, Xlsx};
use nutrition_label_import::{
    AnalyzeDocumentOutput, Block, DocumentAnalyzer, LabelImporter, LlmProvider, OcrError,
};

/// Document analyzer that replays a canned answer and counts calls
pub struct StubAnalyzer {
    output: AnalyzeDocumentOutput,
    failure: Option<(String, String)>,
    calls: AtomicUsize,
}

impl StubAnalyzer {
    pub fn with_lines(lines: &[&str]) -> Arc<Self> {
        let mut blocks = vec![Block {
            block_type: "PAGE".to_string(),
            ..Default::default()
        }];
        blocks.extend(lines.iter().map(|line| Block::line(*line)));
        Arc::new(StubAnalyzer {
            output: AnalyzeDocumentOutput { blocks },
            failure: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(code: &str, message: &str) -> Arc<Self> {
        Arc::new(StubAnalyzer {
            output: AnalyzeDocumentOutput::default(),
            failure: Some((code.to_string(), message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentAnalyzer for StubAnalyzer {
    fn provider_name(&self) -> &str {
        "stub-ocr"
    }

    async fn analyze(&self, _document: &[u8]) -> Result<AnalyzeDocumentOutput, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some((code, message)) => Err(OcrError::Service {
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(self.output.clone()),
        }
    }
}

/// Language model that replays a canned reply and records prompts
pub struct StubProvider {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(StubProvider {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(StubProvider {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub-llm"
    }

    async fn complete(&self, prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|e| e.into())
    }
}

pub fn importer(analyzer: &Arc<StubAnalyzer>, provider: &Arc<StubProvider>) -> LabelImporter {
    LabelImporter::builder()
        .analyzer(analyzer.clone())
        .provider(provider.clone())
        .build()
        .unwrap()
}

pub const LABEL_LINES: &[&str] = &[
    "Nutrition Facts",
    "Calories 100",
    "Total Fat 5g",
    "% Daily Value",
    "Contains: soy, wheat",
];

pub const LABEL_REPLY: &str = r#"{
    "Nutritional Info": {"Calories": "100", "Total Fat": "5g", "Vitamin D": "0mcg"},
    "Other Ingredients": "Contains: soy, wheat"
}"#;

/// A tiny valid PNG
pub fn png_bytes() -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(4, 4)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Sheet names and cell text of an xlsx buffer
pub fn read_workbook(bytes: &[u8]) -> Vec<(String, Vec<Vec<String>>)> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    workbook
        .sheet_names()
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            (name, rows)
        })
        .collect()
}
