use super::{
    paging::Pages,
    prompts::{ActionError, OperatorConsole},
};

/// Prints every item of a paged listing in the order the service returns
/// them, with a separator before each page after the first.
///
/// Items already printed stay on screen when a later page fails.
pub fn print_pages<T>(
    console: &mut dyn OperatorConsole,
    pages: Pages<'_, T>,
    noun: &str,
    render: impl Fn(&T) -> String,
) -> Result<usize, ActionError> {
    let mut count = 0;

    for (index, page) in pages.enumerate() {
        let page = page?;
        if index > 0 {
            console.print_line(&format!("-- page {} --", index + 1))?;
        }
        for item in &page.items {
            console.print_line(&render(item))?;
        }
        count += page.items.len();
    }

    if count == 0 {
        console.print_line("(none)")?;
    } else {
        console.print_line(&format!("{count} {noun}"))?;
    }

    Ok(count)
}
