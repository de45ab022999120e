use serde::Deserialize;

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// 解析 chat completions 流式响应的 SSE 数据，按行切分，跨块缓存半行
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// 喂入一块原始字节，返回其中完整事件携带的文本片段
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut deltas = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if self.done {
                continue;
            }

            let line = String::from_utf8_lossy(&line);
            let Some(data) = line.trim().strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data == "[DONE]" {
                self.done = true;
                continue;
            }

            match serde_json::from_str::<StreamChunk>(data) {
                Ok(chunk) => deltas.extend(
                    chunk
                        .choices
                        .into_iter()
                        .filter_map(|choice| choice.delta.content)
                        .filter(|content| !content.is_empty()),
                ),
                Err(e) => tracing::debug!("Skipping malformed stream event: {}", e),
            }
        }

        deltas
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }
}
