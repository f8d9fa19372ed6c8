use std::{io, net::SocketAddr};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Marks the end of every server reply. Clients read up to the `\r`.
pub const REPLY_TERMINATOR: &str = "\n\r";

/// Body of the reply to `exit`; the client closes its side after it.
pub const CLOSING_PHRASE: &str = "bye!";

const LINE_ENDINGS: &[char] = &['\n', '\r'];

/// One framed server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    body: String,
    closes_session: bool,
}

impl Reply {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            closes_session: false,
        }
    }

    pub fn greeting(peer: SocketAddr) -> Self {
        Self::text(format!("Hello, {peer}"))
    }

    pub fn closing() -> Self {
        Self {
            body: CLOSING_PHRASE.to_string(),
            closes_session: true,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn closes_session(&self) -> bool {
        self.closes_session
    }
}

/// Reads one request line, without its line ending. `None` means the peer
/// closed the stream.
pub async fn read_request<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let bytes = reader.read_line(&mut line).await?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(LINE_ENDINGS).to_string()))
}

pub async fn write_request<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

pub async fn write_reply<W>(writer: &mut W, reply: &Reply) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut framed = String::with_capacity(reply.body.len() + REPLY_TERMINATOR.len());
    framed.push_str(&reply.body);
    framed.push_str(REPLY_TERMINATOR);
    writer.write_all(framed.as_bytes()).await?;
    writer.flush().await
}

/// Reads one reply and strips the terminator. A stream that ends partway
/// through a reply yields whatever arrived.
pub async fn read_reply<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buffer = Vec::new();
    let bytes = reader.read_until(b'\r', &mut buffer).await?;
    if bytes == 0 {
        return Ok(None);
    }

    let text = String::from_utf8(buffer).map_err(to_io_error)?;
    let body = text.strip_suffix(REPLY_TERMINATOR).unwrap_or(&text);
    Ok(Some(body.to_string()))
}

fn to_io_error(err: std::string::FromUtf8Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
