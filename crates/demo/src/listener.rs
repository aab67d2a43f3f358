use std::fmt;

use raw_http::protocol::Request;

/// Renders a parsed request the way `tcplistener` prints it.
#[derive(Debug, Clone, Copy)]
pub struct RequestSummary<'a>(pub &'a Request);

impl fmt::Display for RequestSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request_line = self.0.request_line();

        writeln!(f, "Request line:")?;
        writeln!(f, "- Method: {}", request_line.method())?;
        writeln!(f, "- Target: {}", request_line.target())?;
        writeln!(f, "- Version: {}", request_line.version())?;
        writeln!(f, "Headers:")?;
        for (name, value) in self.0.headers() {
            writeln!(f, "- {name}: {value}")?;
        }
        writeln!(f, "Body:")?;
        writeln!(f, "{}", String::from_utf8_lossy(self.0.body()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use raw_http::connection::read_request;

    #[tokio::test]
    async fn prints_request() {
        let input = "POST /coffee HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 6\r\n\r\nlatte!";
        let request = read_request(input.as_bytes()).await.unwrap();

        let expected = indoc! {"
            Request line:
            - Method: POST
            - Target: /coffee
            - Version: 1.1
            Headers:
            - host: localhost:42069
            - content-length: 6
            Body:
            latte!
        "};
        assert_eq!(RequestSummary(&request).to_string(), expected);
    }
}
