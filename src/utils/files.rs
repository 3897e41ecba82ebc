use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt, Lines},
};

/// Read the non-blank lines of the file at the given path, one message per line
pub async fn read_messages(path: &str) -> io::Result<Vec<String>> {
    let mut r = file_reader(path).await?;
    let mut messages = Vec::new();

    while let Some(line) = r.next_line().await? {
        if !line.trim().is_empty() {
            messages.push(line);
        }
    }

    Ok(messages)
}

async fn file_reader(path: &str) -> io::Result<Lines<io::BufReader<File>>> {
    let f = File::open(path).await?;

    Ok(io::BufReader::new(f).lines())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_read_messages_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.txt");
        std::fs::write(&path, "Free prize!\n\n   \nLunch tomorrow?\n").unwrap();

        let messages = read_messages(path.to_str().unwrap()).await.unwrap();

        assert_eq!(messages, vec!["Free prize!", "Lunch tomorrow?"]);
    }
}
