//! 把 RPC 结果翻译成界面上显示的文字和图片
use std::fmt;

use console::style;
use shapes_client::ClientResult;
use shapes_client::pb::{HelloReply, ShapeReply};

/// 状态图片，对应 demo 界面上的那张图。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusImage {
    Hello,
    Confused,
    Circle,
    Rectangle,
    Square,
    Triangle,
}

impl StatusImage {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusImage::Hello => "hello",
            StatusImage::Confused => "confused",
            StatusImage::Circle => "circle",
            StatusImage::Rectangle => "rectangle",
            StatusImage::Square => "square",
            StatusImage::Triangle => "triangle",
        }
    }

    /// 服务端返回的形状名，大小写只接受全小写或首字母大写。
    fn from_shape(value: &str) -> Option<Self> {
        match value {
            "circle" | "Circle" => Some(StatusImage::Circle),
            "rectangle" | "Rectangle" => Some(StatusImage::Rectangle),
            "square" | "Square" => Some(StatusImage::Square),
            "triangle" | "Triangle" => Some(StatusImage::Triangle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    pub image: StatusImage,
}

impl Outcome {
    fn new(text: impl Into<String>, image: StatusImage) -> Self {
        Self {
            text: text.into(),
            image,
        }
    }

    pub fn from_hello(result: ClientResult<HelloReply>) -> Self {
        match result {
            Ok(_) => Self::new("OK", StatusImage::Hello),
            Err(e) => Self::new(format!("Error: {e}"), StatusImage::Confused),
        }
    }

    pub fn from_shape(result: ClientResult<ShapeReply>) -> Self {
        match result {
            Ok(reply) => match StatusImage::from_shape(&reply.message) {
                Some(image) => Self::new("Approoved!", image),
                None => Self::new(
                    format!("Approoved: unknown shape '{}'", reply.message),
                    StatusImage::Confused,
                ),
            },
            Err(e) => Self::new(format!("Error: {e}"), StatusImage::Confused),
        }
    }

    pub fn is_error(&self) -> bool {
        self.text.starts_with("Error:")
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let image = format!("[{}]", self.image.as_str());
        let image = match self.image {
            StatusImage::Confused => style(image).yellow(),
            _ => style(image).green(),
        };
        let text = if self.is_error() {
            style(&self.text).red()
        } else {
            style(&self.text).bold()
        };
        write!(f, "{image} {text}")
    }
}
