//! The interactive question loop.

use super::{PromptComposer, Retriever};
use crate::error::{CrustError, Result};
use crate::llm::AnswerGenerator;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

/// Input that ends the loop. Compared byte-for-byte, without trimming.
pub const QUIT_SENTINEL: &str = "q";

const SEPARATOR: &str = "\n\n-------------------------------\n";
const PROMPT: &str = "Ask your question (q to quit): ";
const SPACING: &str = "\n\n\n";

/// Everything produced while answering one question.
#[derive(Debug, Clone)]
pub struct Turn {
    pub reviews: Vec<String>,
    pub prompt: String,
    pub answer: String,
}

/// Reads questions, answers each from retrieved reviews, and prints the answer.
///
/// Every turn is independent: nothing from a previous question reaches the
/// next one.
pub struct QaLoop {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn AnswerGenerator>,
    composer: PromptComposer,
    turn_timeout: Option<Duration>,
}

impl QaLoop {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn AnswerGenerator>,
        composer: PromptComposer,
    ) -> Self {
        Self {
            retriever,
            generator,
            composer,
            turn_timeout: None,
        }
    }

    /// Bound each retrieval and generation call. `None` waits indefinitely.
    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Run until the quit sentinel or end of input. Returns the number of
    /// questions answered.
    ///
    /// Collaborator failures end the loop and propagate to the caller.
    pub async fn run<R, W>(&self, mut input: R, mut output: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut answered = 0;

        loop {
            output.write_all(SEPARATOR.as_bytes()).await?;
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                info!("Input closed after {} questions", answered);
                break;
            }
            let question = strip_line_ending(&line);

            output.write_all(SPACING.as_bytes()).await?;

            if question == QUIT_SENTINEL {
                info!("Quit after {} questions", answered);
                break;
            }

            let turn = self.answer(question).await?;

            output.write_all(turn.answer.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
            answered += 1;
        }

        output.flush().await?;
        Ok(answered)
    }

    /// Answer a single question: retrieve, compose, generate.
    #[instrument(skip(self, question), fields(question = %question))]
    pub async fn answer(&self, question: &str) -> Result<Turn> {
        let reviews = self
            .bounded("retrieval", self.retriever.lookup(question))
            .await?;
        debug!("Retrieved {} reviews", reviews.len());

        let prompt = self.composer.compose(&reviews, question);

        let answer = self
            .bounded("generation", self.generator.generate(&prompt))
            .await?;

        Ok(Turn {
            reviews,
            prompt,
            answer,
        })
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.turn_timeout {
            None => call.await,
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CrustError::Timeout { operation, limit })?,
        }
    }
}

/// Drop the trailing `\n` or `\r\n` and nothing else.
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubRetriever {
        reviews: Vec<String>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn lookup(&self, query: &str) -> Result<Vec<String>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.reviews.clone())
        }
    }

    #[derive(Default)]
    struct EchoGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnswerGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            Ok(format!("answer #{}", prompts.len()))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    #[derive(Default)]
    struct FailingRetriever {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Retriever for FailingRetriever {
        async fn lookup(&self, query: &str) -> Result<Vec<String>> {
            self.queries.lock().unwrap().push(query.to_string());
            Err(CrustError::VectorStore("index unavailable".to_string()))
        }
    }

    struct SlowRetriever;

    #[async_trait]
    impl Retriever for SlowRetriever {
        async fn lookup(&self, _query: &str) -> Result<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl AnswerGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }

        fn model(&self) -> &str {
            "slow"
        }
    }

    fn qa_loop(retriever: Arc<StubRetriever>, generator: Arc<EchoGenerator>) -> QaLoop {
        QaLoop::new(retriever, generator, PromptComposer::default())
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("q\n"), "q");
        assert_eq!(strip_line_ending("q\r\n"), "q");
        assert_eq!(strip_line_ending(" q \n"), " q ");
        assert_eq!(strip_line_ending("q"), "q");
    }

    #[tokio::test]
    async fn test_quit_first_turn_makes_no_calls() {
        let retriever = Arc::new(StubRetriever::default());
        let generator = Arc::new(EchoGenerator::default());
        let qa = qa_loop(retriever.clone(), generator.clone());

        let mut output = Vec::new();
        let answered = qa.run(&b"q\n"[..], &mut output).await.unwrap();

        assert_eq!(answered, 0);
        assert!(retriever.queries.lock().unwrap().is_empty());
        assert!(generator.prompts.lock().unwrap().is_empty());
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.starts_with("\n\n-------------------------------\nAsk your question (q to quit): "));
    }

    #[tokio::test]
    async fn test_one_call_each_per_question() {
        let retriever = Arc::new(StubRetriever {
            reviews: vec!["Great crust, friendly staff".to_string()],
            ..Default::default()
        });
        let generator = Arc::new(EchoGenerator::default());
        let qa = qa_loop(retriever.clone(), generator.clone());

        let mut output = Vec::new();
        let answered = qa
            .run(&b"first\n\nthird\nq\n"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(answered, 3);
        assert_eq!(*retriever.queries.lock().unwrap(), vec!["first", "", "third"]);
        assert_eq!(generator.prompts.lock().unwrap().len(), 3);

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches(PROMPT).count(), 4);
        assert!(printed.contains("answer #1\n"));
        assert!(printed.contains("answer #3\n"));
    }

    #[tokio::test]
    async fn test_only_exact_sentinel_quits() {
        let retriever = Arc::new(StubRetriever::default());
        let generator = Arc::new(EchoGenerator::default());
        let qa = qa_loop(retriever.clone(), generator.clone());

        let answered = qa
            .run(&b"Q\nq \n q\nq\n"[..], &mut Vec::new())
            .await
            .unwrap();

        assert_eq!(answered, 3);
        assert_eq!(*retriever.queries.lock().unwrap(), vec!["Q", "q ", " q"]);
    }

    #[tokio::test]
    async fn test_end_of_input_terminates_cleanly() {
        let retriever = Arc::new(StubRetriever::default());
        let generator = Arc::new(EchoGenerator::default());
        let qa = qa_loop(retriever.clone(), generator.clone());

        let answered = qa.run(&b"only question"[..], &mut Vec::new()).await.unwrap();

        assert_eq!(answered, 1);
        assert_eq!(*retriever.queries.lock().unwrap(), vec!["only question"]);
    }

    #[tokio::test]
    async fn test_generator_receives_composed_prompt() {
        let reviews = vec![
            "Great crust, friendly staff".to_string(),
            "Slow service but tasty".to_string(),
        ];
        let retriever = Arc::new(StubRetriever {
            reviews: reviews.clone(),
            ..Default::default()
        });
        let generator = Arc::new(EchoGenerator::default());
        let qa = qa_loop(retriever, generator.clone());

        let question = "What is the best pizza place?";
        let turn = qa.answer(question).await.unwrap();

        let expected = PromptComposer::default().compose(&reviews, question);
        assert_eq!(turn.prompt, expected);
        assert_eq!(*generator.prompts.lock().unwrap(), vec![expected]);
        assert_eq!(turn.reviews, reviews);
        assert_eq!(turn.answer, "answer #1");
    }

    #[tokio::test]
    async fn test_timeout_surfaces_error() {
        let qa = QaLoop::new(
            Arc::new(StubRetriever::default()),
            Arc::new(SlowGenerator),
            PromptComposer::default(),
        )
        .with_turn_timeout(Some(Duration::from_millis(50)));

        let err = qa.answer("hello").await.unwrap_err();
        assert!(matches!(
            err,
            CrustError::Timeout {
                operation: "generation",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_timeout_reports_limit() {
        let qa = QaLoop::new(
            Arc::new(StubRetriever::default()),
            Arc::new(SlowGenerator),
            PromptComposer::default(),
        )
        .with_turn_timeout(Some(Duration::from_millis(50)));

        let err = qa.answer("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "generation timed out after 50ms");
    }

    #[tokio::test]
    async fn test_retriever_failure_ends_loop() {
        let retriever = Arc::new(FailingRetriever::default());
        let generator = Arc::new(EchoGenerator::default());
        let qa = QaLoop::new(retriever.clone(), generator.clone(), PromptComposer::default());

        let mut output = Vec::new();
        let err = qa
            .run(&b"first
second
q
"[..], &mut output)
            .await
            .unwrap_err();

        assert!(matches!(err, CrustError::VectorStore(ref msg) if msg == "index unavailable"));
        assert_eq!(*retriever.queries.lock().unwrap(), vec!["first"]);
        assert!(generator.prompts.lock().unwrap().is_empty());

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches(PROMPT).count(), 1);
    }

    #[tokio::test]
    async fn test_retrieval_timeout_skips_generation() {
        let generator = Arc::new(EchoGenerator::default());
        let qa = QaLoop::new(Arc::new(SlowRetriever), generator.clone(), PromptComposer::default())
            .with_turn_timeout(Some(Duration::from_millis(50)));

        let err = qa
            .run(&b"anything good?
q
"[..], &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CrustError::Timeout {
                operation: "retrieval",
                ..
            }
        ));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_console_input() {
        let input = tokio_test::io::Builder::new()
            .read(b"best calzone?\n")
            .read(b"q\n")
            .build();

        let retriever = Arc::new(StubRetriever::default());
        let generator = Arc::new(EchoGenerator::default());
        let qa = qa_loop(retriever.clone(), generator);

        let answered = qa
            .run(tokio::io::BufReader::new(input), &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(answered, 1);
        assert_eq!(*retriever.queries.lock().unwrap(), vec!["best calzone?"]);
    }
}
