use std::fmt;
use std::sync::Arc;

use tonic::Request;

use super::metadata::Metadata;
use super::part::{Promise, RequestPart};
use crate::error::ChainError;

/// 客户端拦截器。
///
/// 实现必须穷举处理 [`RequestPart`] 的每个阶段，并通过 `context.send` 把（可能修改过的）
/// 阶段交给下一站。拦截器实例会被多个并发调用共享，不能保存单次调用的可变状态。
pub trait ClientInterceptor<M>: Send + Sync {
    fn name(&self) -> &str;

    fn send(
        &self,
        part: RequestPart<M>,
        promise: Option<Promise>,
        context: &mut InterceptorContext<'_, M>,
    );
}

/// 拦截器链的终点。
pub trait Transport<M> {
    fn send(&mut self, part: RequestPart<M>, promise: Option<Promise>);
}

/// 当前拦截器之后的剩余链路。
pub struct InterceptorContext<'a, M> {
    remaining: &'a [Arc<dyn ClientInterceptor<M>>],
    transport: &'a mut dyn Transport<M>,
}

impl<M> InterceptorContext<'_, M> {
    /// 把阶段转发给下一个拦截器，没有剩余拦截器时交给传输层。
    pub fn send(&mut self, part: RequestPart<M>, promise: Option<Promise>) {
        let remaining = self.remaining;
        match remaining.split_first() {
            Some((next, rest)) => {
                tracing::trace!(interceptor = next.name(), part = part.kind(), "forward request part");
                let mut context = InterceptorContext {
                    remaining: rest,
                    transport: &mut *self.transport,
                };
                next.send(part, promise, &mut context);
            }
            None => {
                tracing::trace!(part = part.kind(), "request part reached transport");
                self.transport.send(part, promise);
            }
        }
    }
}

/// 某个 endpoint 的有序拦截器列表。
///
/// clone 出来的链共享同一批拦截器实例。
pub struct InterceptorChain<M> {
    interceptors: Vec<Arc<dyn ClientInterceptor<M>>>,
}

impl<M> InterceptorChain<M> {
    pub fn empty() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn push(&mut self, interceptor: Arc<dyn ClientInterceptor<M>>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// 让一个阶段依次穿过整条链，最后到达 `transport`。
    pub fn send(&self, part: RequestPart<M>, promise: Option<Promise>, transport: &mut dyn Transport<M>) {
        let mut context = InterceptorContext {
            remaining: &self.interceptors,
            transport,
        };
        context.send(part, promise);
    }

    /// 按 metadata → message → end 的顺序驱动一次 unary 调用，并重建 tonic 请求。
    ///
    /// 链上追加的 header 会被追加到请求原有的 metadata 之后，extensions 原样保留。
    pub fn prepare_unary(&self, request: Request<M>) -> Result<Request<M>, ChainError> {
        if self.interceptors.is_empty() {
            return Ok(request);
        }

        let (mut map, extensions, message) = request.into_parts();
        let original = Metadata::from_map(&map);

        let mut outbound = OutboundRequest::default();
        self.send(RequestPart::Metadata(original.clone()), None, &mut outbound);
        self.send(RequestPart::Message(message), None, &mut outbound);
        self.send(RequestPart::End, None, &mut outbound);

        if let Some(kind) = outbound.out_of_order() {
            return Err(ChainError::PartOutOfOrder(kind));
        }
        if outbound.metadata_parts() > 1 {
            return Err(ChainError::MetadataRepeated(outbound.metadata_parts()));
        }
        let metadata = outbound.metadata.ok_or(ChainError::MetadataDropped)?;
        if !metadata.extends(&original) {
            return Err(ChainError::MetadataRewritten);
        }
        if !outbound.ended {
            return Err(ChainError::StreamNotEnded);
        }
        let message = match outbound.messages.len() {
            1 => outbound.messages.pop().ok_or(ChainError::MessageCount(0))?,
            n => return Err(ChainError::MessageCount(n)),
        };

        metadata.append_tail_to(original.len(), &mut map)?;
        Ok(Request::from_parts(map, extensions, message))
    }
}

impl<M> Clone for InterceptorChain<M> {
    fn clone(&self) -> Self {
        Self {
            interceptors: self.interceptors.clone(),
        }
    }
}

impl<M> Default for InterceptorChain<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M> fmt::Debug for InterceptorChain<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<M> FromIterator<Arc<dyn ClientInterceptor<M>>> for InterceptorChain<M> {
    fn from_iter<I: IntoIterator<Item = Arc<dyn ClientInterceptor<M>>>>(iter: I) -> Self {
        Self {
            interceptors: iter.into_iter().collect(),
        }
    }
}

/// 收集到达链尾的各个阶段，供 unary 调用重建请求。
///
/// 只保留第一个 metadata 阶段；重复的 metadata 和乱序到达的阶段会被记下来，由
/// [`InterceptorChain::prepare_unary`] 报错。
#[derive(Debug)]
pub struct OutboundRequest<M> {
    pub metadata: Option<Metadata>,
    pub messages: Vec<M>,
    pub ended: bool,
    metadata_parts: usize,
    out_of_order: Option<&'static str>,
}

impl<M> OutboundRequest<M> {
    /// 到达链尾的 metadata 阶段个数。
    pub fn metadata_parts(&self) -> usize {
        self.metadata_parts
    }

    /// 第一个不符合 metadata → message → end 顺序的阶段。
    pub fn out_of_order(&self) -> Option<&'static str> {
        self.out_of_order
    }

    fn check_order(&mut self, part: &RequestPart<M>) {
        if self.out_of_order.is_some() {
            return;
        }
        let misplaced = match part {
            RequestPart::Metadata(_) => !self.messages.is_empty() || self.ended,
            RequestPart::Message(_) => self.metadata_parts == 0 || self.ended,
            RequestPart::End => self.metadata_parts == 0 || self.ended,
        };
        if misplaced {
            self.out_of_order = Some(part.kind());
        }
    }
}

impl<M> Default for OutboundRequest<M> {
    fn default() -> Self {
        Self {
            metadata: None,
            messages: Vec::new(),
            ended: false,
            metadata_parts: 0,
            out_of_order: None,
        }
    }
}

impl<M> Transport<M> for OutboundRequest<M> {
    fn send(&mut self, part: RequestPart<M>, promise: Option<Promise>) {
        self.check_order(&part);
        match part {
            RequestPart::Metadata(metadata) => {
                self.metadata_parts += 1;
                if self.metadata.is_none() {
                    self.metadata = Some(metadata);
                }
            }
            RequestPart::Message(message) => self.messages.push(message),
            RequestPart::End => self.ended = true,
        }
        if let Some(promise) = promise {
            promise.succeed();
        }
    }
}
