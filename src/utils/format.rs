/// 以印度數字分組格式化金額，例如 150000 -> "₹1,50,000"
pub fn format_inr(amount: u64) -> String {
    format!("₹{}", group_indian(amount))
}

/// 最後三位一組，其餘每兩位一組
pub fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// 一位小數的百分比
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
