// Résumé pipeline prompt templates.
// The JSON schema written into each system prompt is the only output contract:
// nothing downstream validates fields, so the envelope carries whatever comes back.

/// Extraction system prompt. `{personal_info_fields}` and `{education_fields}`
/// are filled per profile.
pub const EXTRACTION_SYSTEM_TEMPLATE: &str = r#"你是一个专业的简历解析助手，服务于中国校园招聘网申场景。

请阅读用户提供的简历文本，提取关键信息，并严格按照下面的 JSON 结构输出。

输出结构：
{
  "personal_info": {
{personal_info_fields}
  },
  "education": [
    {
{education_fields}
    }
  ],
  "work_experience": [
    {
      "company": "公司全称",
      "position": "职位名称",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM",
      "description": "完整的工作描述：职责、项目内容、技术、成果，保留原文全部细节",
      "achievements": ["成果1", "成果2"],
      "tech_stack": ["技术1", "技术2"]
    }
  ],
  "projects": [
    {
      "name": "项目名称",
      "role": "担任角色",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM",
      "description": "完整的项目描述：背景、个人职责、技术方案、成果，保留原文全部细节",
      "achievements": ["成果1", "成果2"],
      "tech_stack": ["技术1", "技术2"]
    }
  ],
  "campus_experience": [
    {
      "organization": "组织名称",
      "role": "担任职务",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM",
      "description": "经历描述"
    }
  ],
  "skills_certifications": {
    "skills": ["技能1", "技能2"]
  }
}

规则：
1. 日期统一为 "YYYY-MM" 格式。
2. 各列表按时间倒序排列。
3. 简历中没有的信息填空字符串或空数组。
4. 专有名词保持原文写法。
5. description 字段必须完整保留原文描述，不得删减或概括。
6. campus_experience 指学生会、社团、志愿者、班干部等校园经历。
7. 如果简历中没有校园经历，campus_experience 必须是空数组 []，严禁编造。
8. 只输出 JSON 本身，不要输出任何其他文字。"#;

pub const STANDARD_PERSONAL_INFO_FIELDS: &str = r#"    "name": "姓名",
    "phone": "电话",
    "email": "邮箱""#;

pub const DETAILED_PERSONAL_INFO_FIELDS: &str = r#"    "name": "姓名",
    "gender": "性别",
    "phone": "电话",
    "email": "邮箱",
    "hometown": "籍贯""#;

pub const STANDARD_EDUCATION_FIELDS: &str = r#"      "school": "学校全称",
      "major": "专业",
      "degree": "学位",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM""#;

pub const DETAILED_EDUCATION_FIELDS: &str = r#"      "school": "学校全称",
      "major": "专业",
      "degree": "学位",
      "gpa": "GPA 或排名，原文写法",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM""#;

pub const EXTRACTION_USER_TEMPLATE: &str = "以下是简历文本内容，请解析：\n\n{resume_text}";

pub const ADVICE_SYSTEM: &str = r#"你是一位资深的简历优化顾问，帮助中国学生改进校招简历。

请从以下维度评估简历：
1. 格式与排版：是否简洁清晰、重点突出、没有冗余。
2. 内容质量：是否有量化成果，是否用 STAR 法则描述经历，是否体现个人贡献。
3. 关键词：是否覆盖目标岗位关键词，技能描述是否具体。
4. 校招针对性：结合校招场景的建议与常见错误。

严格按照下面的 JSON 结构输出：
{
  "score": 85,
  "summary": "整体评价，2-3 句话",
  "strengths": ["优点1", "优点2", "优点3"],
  "improvements": [
    {
      "section": "所在模块，如 工作经历",
      "issue": "存在的问题",
      "suggestion": "具体可执行的修改建议"
    }
  ],
  "action_items": ["立即修改项", "建议优化项", "长期提升项"]
}

要求：
- score 为 0 到 100 的整数。
- 建议具体、可操作，语气专业且鼓励。
- 只输出 JSON 本身，不要输出任何其他文字。"#;

pub const ADVICE_USER_TEMPLATE: &str =
    "请分析以下简历并提供修改建议：\n\n---简历开始---\n{resume_text}\n---简历结束---";
