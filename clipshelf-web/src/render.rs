use clipshelf::CatalogRecord;

/// Escape user-controlled text for embedding in HTML.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the catalog page: submission form, category filter, records table.
pub fn page(records: &[CatalogRecord]) -> String {
    let mut rows = String::new();
    for r in records {
        let transcript_cell = match &r.transcript_path {
            Some(path) => escape(path),
            None => "—".to_string(),
        };
        rows.push_str(&format!(
            "<tr>\
             <td>{id}</td>\
             <td>{title}</td>\
             <td>{media}</td>\
             <td>{transcript}</td>\
             <td>{platform}</td>\
             <td>{category}</td>\
             <td><form method=\"post\" action=\"/delete/{id}\">\
             <button type=\"submit\">Delete</button></form></td>\
             </tr>\n",
            id = r.id,
            title = escape(&r.title),
            media = escape(r.media_path.as_deref().unwrap_or("—")),
            transcript = transcript_cell,
            platform = escape(&r.platform),
            category = escape(&r.category),
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n<head>\n<meta charset=\"utf-8\">\n<title>clipshelf</title>\n</head>\n<body>\n\
         <h1>clipshelf</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <input type=\"url\" name=\"url\" placeholder=\"Video URL\" required>\n\
         <select name=\"platform\">\n\
         <option value=\"youtube\">YouTube</option>\n\
         <option value=\"instagram\">Instagram</option>\n\
         </select>\n\
         <input type=\"text\" name=\"category\" placeholder=\"Category\">\n\
         <button type=\"submit\">Download</button>\n\
         </form>\n\
         <form method=\"get\" action=\"/\">\n\
         <input type=\"text\" name=\"category\" placeholder=\"Filter by category\">\n\
         <button type=\"submit\">Filter</button>\n\
         </form>\n\
         <table border=\"1\">\n\
         <tr><th>ID</th><th>Title</th><th>Media</th><th>Transcript</th>\
         <th>Platform</th><th>Category</th><th></th></tr>\n\
         {rows}\
         </table>\n\
         </body>\n</html>\n"
    )
}
