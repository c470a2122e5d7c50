//! The prompt table shipped with the extension.

use crate::model::{PromptDefinition, UrlPromptMapping};

/// Prompts that are not tied to any URL.
pub fn global_prompts() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition::predefined(
            "Read about our vision and upvote ❤️",
            "Read about our vision and upvote",
            "browseros-launch-upvoter",
            "BrowserOS Launch Upvoter",
            "Navigate to BrowserOS launch page and upvote it",
            &[
                "Navigate to https://dub.sh/browseros-launch",
                "Find and click the upvote button on the page using visual_click",
                "Use celebration tool to show confetti animation",
            ],
        ),
        PromptDefinition::predefined(
            "Support BrowserOS on Github ⭐",
            "Support BrowserOS on GitHub",
            "github-star-browseros",
            "GitHub Repository Star",
            "Navigate to BrowserOS GitHub repo and star it",
            &[
                "Navigate to https://git.new/browserOS",
                "Check if the star button indicates already starred (filled star icon)",
                "If not starred (outline star icon), click the star button to star the repository",
                "Use celebration_tool to show confetti animation",
            ],
        ),
    ]
}

/// URL-scoped prompts, in match priority order.
pub fn url_mappings() -> Vec<UrlPromptMapping> {
    vec![
        mapping(
            "*leetcode.com/problems/*",
            vec![
                PromptDefinition::predefined(
                    "Fix my code to pass all test cases 🔧",
                    "Fix my code to pass all test cases",
                    "leetcode-code-fixer",
                    "LeetCode Code Fixer",
                    "Fix the code to pass all test cases",
                    &[
                        "Extract the current code from the code editor panel using extract tool to get the full code content",
                        "Extract the error message and details from the \"Test Result\" tab to understand what type of error occurred (syntax error, runtime error, wrong answer, etc.)",
                        "Analyze the error message to identify the specific issue - check the error type, line number, and error description",
                        "Click on the code editor area to focus it, then use key tool to press Ctrl+A (or Cmd+A on Mac) to select all existing code",
                        "Use clear tool to clear the selected code from the editor",
                        "Type the corrected code into the editor using type tool, fixing the identified issues (syntax errors, logic errors, missing code, incorrect algorithms, etc.)",
                        "Click the \"Run\" button (or \"Play\" button) in the top toolbar to execute the code and test it",
                        "Wait for test execution to complete using wait tool (typically 2-3 seconds for code execution)",
                        "Extract the test results from the \"Test Result\" tab to check if the error is resolved and all test cases pass",
                        "If error persists or tests still fail, extract the new error message, analyze what went wrong, clear the editor again with Ctrl+A and clear tool, then type the newly corrected code",
                        "Repeat the run-test-check cycle until all test cases pass with no errors or wrong answers",
                        "Once all tests pass successfully (check the \"Test Result\" tab shows success), click the \"Submit\" button in the top toolbar to submit the solution",
                    ],
                ),
                PromptDefinition::predefined(
                    "Write an optimal solution with step-by-step explanation 📝",
                    "Write an optimal solution with step-by-step explanation",
                    "leetcode-solution-writer",
                    "LeetCode Solution Writer",
                    "Write an optimal solution with step-by-step explanation",
                    &[
                        "Analyze the problem requirements",
                        "Design an optimal algorithm",
                        "Implement the solution",
                        "Provide step-by-step explanation",
                    ],
                ),
            ],
        ),
        mapping(
            "*github.com/*/*/pull/*",
            vec![
                PromptDefinition::predefined(
                    "Summarize PR changes 📝",
                    "Summarize the changes in this PR",
                    "github-pr-summarizer",
                    "GitHub PR Summarizer",
                    "Summarize the changes in this PR",
                    &[
                        "Extract the PR title and description to understand the context",
                        "Click on the \"Files changed\" tab to view the code changes",
                        "Extract the file names and code diffs from the \"Files changed\" view",
                        "Analyze the changes to understand what was modified, added, or deleted",
                        "Generate a concise summary of the changes, grouping them by component or functionality",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Review PR changes 🔍",
                    "Review the changes in this PR for code quality and bugs",
                    "github-pr-reviewer",
                    "GitHub PR Reviewer",
                    "Review the changes in this PR for code quality and bugs",
                    &[
                        "Extract the PR title and description to understand the context",
                        "Click on the \"Files changed\" tab to view the code changes",
                        "Extract the file names and code diffs from the \"Files changed\" view",
                        "Analyze the code changes for potential bugs, security issues, and code quality improvements",
                        "Check for adherence to best practices and coding standards",
                        "Generate a review report highlighting any issues found and suggestions for improvement",
                        "Present the review report to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*youtube.com/watch*",
            vec![
                PromptDefinition::predefined(
                    "Summarize video 📝",
                    "Summarize this video",
                    "youtube-summarizer",
                    "YouTube Video Summarizer",
                    "Summarize the video content",
                    &[
                        "Extract the video title and description",
                        "Check if the transcript is available and extract it",
                        "If transcript is not available, use the description and visual context",
                        "Generate a concise summary of the video content",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Extract key takeaways 🔑",
                    "Extract key takeaways from this video",
                    "youtube-takeaways",
                    "YouTube Key Takeaways",
                    "Extract key takeaways from the video",
                    &[
                        "Extract the video content (transcript/description)",
                        "Identify the main points and actionable advice",
                        "List the key takeaways in a bulleted format",
                        "Present the takeaways to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Find timestamps ⏱️",
                    "Create a table of contents with timestamps",
                    "youtube-timestamps",
                    "YouTube Timestamp Generator",
                    "Create a table of contents with timestamps",
                    &[
                        "Analyze the video content to identify topic transitions",
                        "Generate a list of topics with their corresponding timestamps",
                        "Present the table of contents to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*amazon.com/*/dp/*",
            vec![
                PromptDefinition::predefined(
                    "Summarize reviews ⭐",
                    "Summarize the customer reviews",
                    "amazon-review-summarizer",
                    "Amazon Review Summarizer",
                    "Summarize customer reviews",
                    &[
                        "Scroll to the reviews section",
                        "Extract the top positive and critical reviews",
                        "Analyze the common themes, pros, and cons",
                        "Generate a balanced summary of user sentiment",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Compare with similar items ⚖️",
                    "Compare this item with similar products",
                    "amazon-comparator",
                    "Amazon Product Comparator",
                    "Compare with similar items",
                    &[
                        "Identify similar items in the \"Compare with similar items\" section or recommendations",
                        "Extract key specs, prices, and ratings for comparison",
                        "Create a comparison table",
                        "Highlight the best value option",
                        "Present the comparison to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Is this a good deal? 💰",
                    "Analyze if this product is a good deal",
                    "amazon-deal-analyzer",
                    "Amazon Deal Analyzer",
                    "Analyze price and value",
                    &[
                        "Extract the current price and list price",
                        "Check for any active coupons or promotions",
                        "Compare with prices of similar items if available",
                        "Provide an assessment of whether this is a good deal",
                        "Present the analysis to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*mail.google.com/*",
            vec![
                PromptDefinition::predefined(
                    "Summarize thread 🧵",
                    "Summarize this email thread",
                    "gmail-thread-summarizer",
                    "Gmail Thread Summarizer",
                    "Summarize the email conversation",
                    &[
                        "Extract the content of all emails in the current thread",
                        "Identify the key participants and main discussion points",
                        "Generate a chronological summary of the conversation",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Draft reply ✍️",
                    "Draft a reply to this email",
                    "gmail-reply-drafter",
                    "Gmail Reply Drafter",
                    "Draft a reply",
                    &[
                        "Analyze the latest email and the thread context",
                        "Determine the appropriate tone and key points to address",
                        "Draft a response email",
                        "Present the draft to the user for review",
                    ],
                ),
                PromptDefinition::predefined(
                    "Extract action items ✅",
                    "Extract action items from this email",
                    "gmail-action-extractor",
                    "Gmail Action Item Extractor",
                    "Identify tasks and deadlines",
                    &[
                        "Analyze the email content for requests, tasks, and deadlines",
                        "Extract specific action items and who they are assigned to",
                        "List the action items clearly",
                        "Present the list to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*linkedin.com/in/*",
            vec![
                PromptDefinition::predefined(
                    "Summarize profile 👤",
                    "Summarize this LinkedIn profile",
                    "linkedin-profile-summarizer",
                    "LinkedIn Profile Summarizer",
                    "Summarize professional profile",
                    &[
                        "Extract the user's headline, about section, and experience",
                        "Identify key skills and achievements",
                        "Generate a professional summary of the person",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Draft connection message 🤝",
                    "Draft a connection request message",
                    "linkedin-connect-drafter",
                    "LinkedIn Connection Msg Drafter",
                    "Draft a personalized connection message",
                    &[
                        "Analyze the profile to find common interests or relevant experience",
                        "Draft a polite and personalized connection request message (under 300 chars)",
                        "Present the draft to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*twitter.com/*/status/*",
            vec![
                PromptDefinition::predefined(
                    "Summarize thread 🧵",
                    "Summarize this Twitter thread",
                    "twitter-thread-summarizer",
                    "Twitter Thread Summarizer",
                    "Summarize the thread",
                    &[
                        "Extract the main tweet and subsequent replies in the thread",
                        "Synthesize the main argument or story",
                        "Generate a concise summary",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Fact check 🔍",
                    "Fact check the claims in this tweet",
                    "twitter-fact-checker",
                    "Twitter Fact Checker",
                    "Verify claims",
                    &[
                        "Identify the main claims made in the tweet",
                        "Search for reliable sources to verify the information",
                        "Compare the claims with the found evidence",
                        "Provide a fact-check report",
                        "Present the report to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*x.com/*/status/*",
            vec![
                PromptDefinition::predefined(
                    "Summarize thread 🧵",
                    "Summarize this X thread",
                    "x-thread-summarizer",
                    "X Thread Summarizer",
                    "Summarize the thread",
                    &[
                        "Extract the main post and subsequent replies in the thread",
                        "Synthesize the main argument or story",
                        "Generate a concise summary",
                        "Present the summary to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Fact check 🔍",
                    "Fact check the claims in this post",
                    "x-fact-checker",
                    "X Fact Checker",
                    "Verify claims",
                    &[
                        "Identify the main claims made in the post",
                        "Search for reliable sources to verify the information",
                        "Compare the claims with the found evidence",
                        "Provide a fact-check report",
                        "Present the report to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*wikipedia.org/wiki/*",
            vec![
                PromptDefinition::predefined(
                    "TL;DR ⚡",
                    "Provide a TL;DR summary of this article",
                    "wikipedia-tldr",
                    "Wikipedia TL;DR",
                    "Summarize article",
                    &[
                        "Extract the introduction and section headers",
                        "Generate a 3-bullet point summary of the main topic",
                        "Present the TL;DR to the user",
                    ],
                ),
                PromptDefinition::predefined(
                    "Explain like I'm 5 👶",
                    "Explain this topic like I am 5 years old",
                    "wikipedia-eli5",
                    "Wikipedia ELI5",
                    "Simplify explanation",
                    &[
                        "Analyze the article content",
                        "Rewrite the core concept using simple language and analogies",
                        "Present the simplified explanation to the user",
                    ],
                ),
            ],
        ),
        mapping(
            "*stackoverflow.com/questions/*",
            vec![PromptDefinition::predefined(
                "Summarize solution ✅",
                "Summarize the best solution for this question",
                "stackoverflow-summarizer",
                "StackOverflow Solution Summarizer",
                "Summarize best solution",
                &[
                    "Identify the accepted answer and highly upvoted answers",
                    "Extract the code snippets and explanations",
                    "Synthesize a comprehensive solution",
                    "Present the solution to the user",
                ],
            )],
        ),
        mapping(
            "*news.ycombinator.com/item*",
            vec![PromptDefinition::predefined(
                "Summarize discussion 💬",
                "Summarize the Hacker News discussion",
                "hn-discussion-summarizer",
                "Hacker News Summarizer",
                "Summarize discussion",
                &[
                    "Extract the top comments and threads",
                    "Identify the main arguments, counter-arguments, and consensus",
                    "Generate a summary of the discussion",
                    "Present the summary to the user",
                ],
            )],
        ),
    ]
}

fn mapping(pattern: &str, prompts: Vec<PromptDefinition>) -> UrlPromptMapping {
    UrlPromptMapping {
        pattern: pattern.to_string(),
        prompts,
    }
}
