use tokio::sync::oneshot;

use super::metadata::Metadata;

/// 出站请求的一个阶段。
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart<M> {
    /// 请求头，每次调用开始时发送一次。
    Metadata(Metadata),
    /// 请求消息。unary / server-streaming 恰好一条，client / bidi streaming 可以有任意条。
    Message(M),
    /// 请求流结束，只发送一次，之后不能再发送消息。
    End,
}

impl<M> RequestPart<M> {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestPart::Metadata(_) => "metadata",
            RequestPart::Message(_) => "message",
            RequestPart::End => "end",
        }
    }
}

/// 某个阶段被传输层接收后的完成通知。
#[derive(Debug)]
pub struct Promise(oneshot::Sender<()>);

impl Promise {
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn succeed(self) {
        // 接收方已经不关心结果时直接丢弃
        let _ = self.0.send(());
    }
}
